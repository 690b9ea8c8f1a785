use super::*;
use chrono::TimeZone;

fn sample_slab() -> Slab {
    Slab {
        price: 0,
        color: "Black, White".to_string(),
        finish: Finish::Polished,
        thickness: 3.0,
        lot: "6656".to_string(),
        bundle: "1497U".to_string(),
        width: 77.5,
        length: 130.0,
        count: 2,
        vendor: Vendor::Cosmos,
        url: "https://www.cosmosgranite.com/charlotte/granite/charlotte-293-titanium".to_string(),
        photo: "https://cdn.example.com/LotImg_Titanium_6656.JPEG".to_string(),
        first_seen: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        last_seen: Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap(),
    }
}

#[test]
fn test_serialize_uses_pascal_case_and_integer_codes() {
    let value = serde_json::to_value(sample_slab()).unwrap();

    assert_eq!(value["Lot"], "6656");
    assert_eq!(value["Bundle"], "1497U");
    assert_eq!(value["URL"], "https://www.cosmosgranite.com/charlotte/granite/charlotte-293-titanium");
    assert_eq!(value["Vendor"], 2);
    assert_eq!(value["Finish"], 1);
    assert_eq!(value["Count"], 2);
    assert!(value.get("url").is_none());
}

#[test]
fn test_deserialize_legacy_snapshot_entry() {
    // Offsets other than UTC and missing fields both occur in older snapshots
    let json = r#"{
        "Price": 0,
        "Color": "Black, White",
        "Finish": 3,
        "Thickness": 3,
        "Lot": "A12",
        "Bundle": "7",
        "Width": 65,
        "Length": 130,
        "Count": 4,
        "Vendor": 1,
        "URL": "https://www.stonebasyx.com/live-inventory/product-details/?selproductid=690",
        "Photo": "https://www.stonebasyx.com/img/a12.jpg",
        "FirstSeen": "2023-05-01T10:00:00.123456789-04:00",
        "LastSeen": "2023-05-01T14:00:00.123456789Z"
    }"#;

    let slab: Slab = serde_json::from_str(json).unwrap();

    assert_eq!(slab.vendor, Vendor::StoneBasyx);
    assert_eq!(slab.finish, Finish::Honed);
    assert_eq!(slab.thickness, 3.0);
    assert_eq!(slab.count, 4);
    assert_eq!(slab.first_seen, slab.last_seen);
    assert!(slab.is_new());
}

#[test]
fn test_unknown_codes_map_to_unknown() {
    let slab: Slab = serde_json::from_str(r#"{"Vendor": 42, "Finish": -1}"#).unwrap();
    assert_eq!(slab.vendor, Vendor::Unknown);
    assert_eq!(slab.finish, Finish::Unknown);
    assert_eq!(slab.vendor.to_string(), "UnknownVendor");
    assert_eq!(slab.finish.to_string(), "UnknownFinish");
}

#[test]
fn test_finish_labels() {
    assert_eq!(Finish::from_label("Polished"), Finish::Polished);
    assert_eq!(Finish::from_label("Honed"), Finish::Honed);
    assert_eq!(Finish::from_label("Leather"), Finish::Leather);
    assert_eq!(Finish::from_label(" Leathered "), Finish::Leather);
    assert_eq!(Finish::from_label("Brushed"), Finish::Unknown);
}

#[test]
fn test_integer_codes_are_stable() {
    for vendor in [Vendor::Unknown, Vendor::StoneBasyx, Vendor::Cosmos] {
        assert_eq!(Vendor::from(i64::from(vendor)), vendor);
    }
    for finish in [Finish::Unknown, Finish::Polished, Finish::Leather, Finish::Honed] {
        assert_eq!(Finish::from(i64::from(finish)), finish);
    }
}

#[test]
fn test_summary_format() {
    let summary = sample_slab().to_string();
    assert_eq!(
        summary,
        "Length: 130, Count: 2, Lot: 6656, Bundle: 1497U, Finish: Polished, Vendor: Cosmos, \
         URL: https://www.cosmosgranite.com/charlotte/granite/charlotte-293-titanium"
    );
}

#[test]
fn test_new_slab_is_empty_apart_from_vendor() {
    let slab = Slab::new(Vendor::StoneBasyx);
    assert_eq!(slab.vendor, Vendor::StoneBasyx);
    assert_eq!(slab.finish, Finish::Unknown);
    assert!(slab.lot.is_empty());
    assert_eq!(slab.count, 0);
}
