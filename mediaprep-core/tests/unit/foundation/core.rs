use super::*;

#[test]
fn threshold_accepts_full_u8_range() {
    assert_eq!(Threshold::new(0).unwrap().get(), 0);
    assert_eq!(Threshold::new(255).unwrap().get(), 255);
    assert_eq!(Threshold::new(240).unwrap(), Threshold::from_u8(240));
}

#[test]
fn threshold_rejects_out_of_range_values() {
    for bad in [-1, 256, i64::MIN, i64::MAX] {
        let err = Threshold::new(bad).unwrap_err();
        assert!(matches!(err, MediaprepError::InvalidArgument(_)), "{bad}");
    }
}

#[test]
fn threshold_deserializes_through_validation() {
    let t: Threshold = serde_json::from_str("230").unwrap();
    assert_eq!(t.get(), 230);
    assert!(serde_json::from_str::<Threshold>("300").is_err());
    assert_eq!(serde_json::to_string(&t).unwrap(), "230");
}

#[test]
fn color_parses_hex_and_triplets() {
    let brand = RgbColor::new(225, 221, 214);
    assert_eq!("#E1DDD6".parse::<RgbColor>().unwrap(), brand);
    assert_eq!("e1ddd6".parse::<RgbColor>().unwrap(), brand);
    assert_eq!("225, 221, 214".parse::<RgbColor>().unwrap(), brand);
    assert_eq!(brand.to_string(), "#E1DDD6");
    assert_eq!(brand.opaque(), [225, 221, 214, 255]);
}

#[test]
fn color_rejects_garbage() {
    for bad in ["", "#E1DD", "#GGGGGG", "1,2", "1,2,3,4", "256,0,0", "#ÄÄÄ"] {
        assert!(bad.parse::<RgbColor>().is_err(), "{bad}");
    }
}
