use proptest::prelude::*;
use tessera_constraints::ContrastValidator;
use tessera_constraints::color::{Hsl, contrast_ratio, mix};
use tessera_model::Rgb;

fn rgb() -> impl Strategy<Value = Rgb> {
    any::<(u8, u8, u8)>().prop_map(|(r, g, b)| Rgb::new(r, g, b))
}

proptest! {
    #[test]
    fn contrast_is_symmetric_and_bounded(a in rgb(), b in rgb()) {
        let ratio = contrast_ratio(a, b);
        prop_assert!((ratio - contrast_ratio(b, a)).abs() < 1e-12);
        prop_assert!((1.0..=21.0 + 1e-9).contains(&ratio));
    }

    #[test]
    fn aa_correction_always_reaches_minimum(color in rgb(), against in rgb()) {
        let validator = ContrastValidator::new("contrast-aa", 4.5);
        let corrected = validator.correct(color, against);
        prop_assert!(contrast_ratio(corrected, against) >= 4.5);
    }

    #[test]
    fn hsl_round_trips(color in rgb()) {
        prop_assert_eq!(Hsl::from_rgb(color).to_rgb(), color);
    }

    #[test]
    fn mix_endpoints(a in rgb(), b in rgb()) {
        prop_assert_eq!(mix(a, b, 0.0), a);
        prop_assert_eq!(mix(a, b, 1.0), b);
    }
}
