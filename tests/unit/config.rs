use super::*;
use crate::foundation::core::Point;

#[test]
fn empty_object_is_default_config() {
    let cfg = BadgeConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, BadgeConfig::default());
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.template.source, "Template Post_empty.png");
    assert_eq!(cfg.placeholder.as_deref(), Some("placeholder-avatar.png"));
    assert_eq!(cfg.gestures.min_scale, 0.1);
}

#[test]
fn partial_sections_keep_other_defaults() {
    let cfg = BadgeConfig::from_reader(
        r#"{
            "dpr": 2.0,
            "placeholder": null,
            "template": { "mask": { "center": { "x": 10.0, "y": 20.0 }, "radius": 5.0 } },
            "gestures": { "wheel_step": 0.1 }
        }"#
        .as_bytes(),
    )
    .unwrap();
    assert_eq!(cfg.dpr.get(), 2.0);
    assert_eq!(cfg.placeholder, None);
    assert_eq!(cfg.template.mask.center, Point::new(10.0, 20.0));
    assert_eq!(cfg.template.source, "Template Post_empty.png");
    assert_eq!(cfg.gestures.wheel_step, 0.1);
    assert_eq!(cfg.gestures.pinch_sensitivity, 0.005);
    assert!(cfg.validate().is_ok());
}

#[test]
fn unknown_fields_are_rejected() {
    let err = BadgeConfig::from_reader(r#"{ "tempalte": {} }"#.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("validation error:"));
}

#[test]
fn invalid_dpr_is_rejected_at_parse() {
    assert!(BadgeConfig::from_reader(r#"{ "dpr": -1.0 }"#.as_bytes()).is_err());
}

#[test]
fn oversized_surface_fails_validation() {
    let cfg = BadgeConfig {
        dpr: DevicePixelRatio::new(100.0).unwrap(),
        ..BadgeConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn placeholder_path_is_checked() {
    let cfg = BadgeConfig {
        placeholder: Some("../outside.png".into()),
        ..BadgeConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn missing_file_reports_path() {
    let err = BadgeConfig::from_path("target/does/not/exist.json").unwrap_err();
    assert!(err.to_string().contains("exist.json"));
}
