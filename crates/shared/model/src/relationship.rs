use serde::{Deserialize, Serialize};

/// Declares how a base token drives other tokens.
///
/// `generates` tokens are derived by generators keyed by the target name,
/// `affects` tokens by affect rules keyed by roles. The two lists are disjoint
/// and every list is duplicate-free; registration rejects anything else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Relationship {
    pub generates: Vec<String>,
    pub affects: Vec<String>,
    pub constraints: Vec<String>,
    pub domain: String,
}

impl Relationship {
    #[must_use]
    pub fn new(domain: impl Into<String>) -> Self {
        Self { domain: domain.into(), ..Self::default() }
    }

    #[must_use]
    pub fn generates<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.generates.extend(tokens.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn affects<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.affects.extend(tokens.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn constraints<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraints.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Every derived token, generated ones first, in declaration order.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.generates.iter().chain(&self.affects).map(String::as_str)
    }

    /// First token listed in both `generates` and `affects`.
    #[must_use]
    pub fn overlap(&self) -> Option<&str> {
        self.generates.iter().find(|t| self.affects.contains(t)).map(String::as_str)
    }

    /// First entry repeated inside one of the lists.
    #[must_use]
    pub fn duplicate(&self) -> Option<&str> {
        [&self.generates, &self.affects, &self.constraints]
            .into_iter()
            .find_map(|list| first_duplicate(list))
    }
}

fn first_duplicate(list: &[String]) -> Option<&str> {
    list.iter().enumerate().find(|(i, item)| list[..*i].contains(item)).map(|(_, item)| item.as_str())
}
