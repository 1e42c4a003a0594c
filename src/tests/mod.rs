use crate::Error;
use crate::catalog::{
    Session, extract, regenerate,
    types::{Category, Kind, Promotion, Record, RecordDraft, SpecEntry},
};

const FIXTURE: &str = include_str!("fixtures/index.html");

fn reindexed(records: &[Record]) -> Vec<Record> {
    records
        .iter()
        .enumerate()
        .map(|(position, record)| Record {
            id: position as u32,
            ..record.clone()
        })
        .collect()
}

#[test]
fn extracts_records_in_document_order() {
    let records = extract(FIXTURE).unwrap();
    assert_eq!(records.len(), 3);

    assert_eq!(records[0].id, 0);
    assert_eq!(records[0].name, "Titan Creator Pro");
    assert_eq!(records[0].kind, Some(Kind::Desktop));
    assert_eq!(records[0].category, Category::Custom);
    assert_eq!(records[0].price, "$2,149");
    assert_eq!(records[0].image, "./assets/titan-creator.jpg");
    assert!(records[0].promotion.is_none());

    assert_eq!(records[1].id, 1);
    assert_eq!(records[1].name, "Aero Slim 14");
    assert_eq!(records[1].kind, Some(Kind::Laptop));
    // No data-category attribute on this card; the badge class decides.
    assert_eq!(records[1].category, Category::New);

    assert_eq!(records[2].id, 2);
    assert_eq!(records[2].name, "Workhorse Tower");
}

#[test]
fn extraction_heals_legacy_spec_rows() {
    let records = extract(FIXTURE).unwrap();

    // Duplicate RAM row and the Storage/Storage corruption are gone.
    assert_eq!(
        records[0].specs,
        vec![
            SpecEntry::new("Processor", "Intel Core i9-13900K"),
            SpecEntry::new("RAM", "32GB DDR5"),
            SpecEntry::new("Graphics", "RTX 4080"),
        ]
    );

    // The transposed warranty row is swapped back; entities are decoded.
    assert_eq!(
        records[1].specs,
        vec![
            SpecEntry::new("Parts Warranty", "3 Year Coverage"),
            SpecEntry::new("Display", "14\" OLED"),
        ]
    );
}

#[test]
fn extraction_detects_promotion() {
    let records = extract(FIXTURE).unwrap();
    let promoted = &records[2];

    assert_eq!(
        promoted.promotion,
        Some(Promotion {
            enabled: true,
            original_price: "$2,499".to_string(),
            sale_price: "$1,999.20".to_string(),
            discount: 20,
        })
    );
    // Edit forms show the undiscounted value.
    assert_eq!(promoted.price, "$2,499");
    // Legacy rule: black-friday badged cards count as refurbished stock.
    assert_eq!(promoted.category, Category::Refurbished);
}

#[test]
fn missing_region_is_fatal() {
    let document = "<html><body><p>no catalog here</p></body></html>";
    assert!(matches!(extract(document), Err(Error::MissingCatalogRegion)));
    assert!(matches!(
        regenerate(document, &[]),
        Err(Error::MissingCatalogRegion)
    ));
}

#[test]
fn empty_collection_regenerates_empty_region() {
    let emptied = regenerate(FIXTURE, &[]).unwrap();
    assert_eq!(extract(&emptied).unwrap(), vec![]);

    // Everything outside the catalog region passes through unchanged.
    assert!(emptied.contains("<title>Riverside Computer Store</title>"));
    assert!(emptied.contains("Riverside Computer Store, est. 2004"));
    assert!(emptied.contains("<h2>Our Computers</h2>"));
}

#[test]
fn round_trip_preserves_records() {
    let records = vec![
        Record {
            id: 4,
            name: "Atlas Mini <G2>".to_string(),
            kind: Some(Kind::Desktop),
            category: Category::Custom,
            price: "$1899.00".to_string(),
            image: "./assets/atlas-mini.jpg".to_string(),
            specs: vec![
                SpecEntry::new("Processor", "AMD Ryzen 7 7700"),
                SpecEntry::new("RAM", "32GB DDR5"),
            ],
            promotion: Some(Promotion {
                enabled: true,
                original_price: "$1899.00".to_string(),
                sale_price: "$1614.15".to_string(),
                discount: 15,
            }),
        },
        Record {
            id: 9,
            name: "Nimbus Air 13".to_string(),
            kind: None,
            category: Category::New,
            price: "$899".to_string(),
            image: "./assets/nimbus-air.jpg".to_string(),
            specs: vec![SpecEntry::new("Display", "13\" IPS")],
            promotion: None,
        },
    ];

    let regenerated = regenerate(FIXTURE, &records).unwrap();
    let extracted = extract(&regenerated).unwrap();

    // Ids are reassigned by position; every other field survives the trip.
    assert_eq!(extracted, reindexed(&records));
}

#[test]
fn regenerate_truncates_specs_to_four_rows() {
    let record = Record {
        id: 0,
        name: "Spec Heavy".to_string(),
        kind: Some(Kind::Desktop),
        category: Category::Refurbished,
        price: "$499".to_string(),
        image: "./assets/spec-heavy.jpg".to_string(),
        specs: (1..=6)
            .map(|n| SpecEntry::new(format!("Slot {n}"), format!("Part {n}")))
            .collect(),
        promotion: None,
    };

    let regenerated = regenerate(FIXTURE, std::slice::from_ref(&record)).unwrap();
    let extracted = extract(&regenerated).unwrap();

    assert_eq!(
        extracted[0].specs,
        (1..=4)
            .map(|n| SpecEntry::new(format!("Slot {n}"), format!("Part {n}")))
            .collect::<Vec<_>>()
    );
}

#[test]
fn session_edit_flow() {
    let mut session = Session::load(FIXTURE.to_string()).unwrap();
    assert!(!session.is_dirty());
    assert_eq!(session.records().len(), 3);

    session.delete(1);
    session.promote(0, 20).unwrap();
    session
        .add(RecordDraft {
            name: "Bench Node".to_string(),
            kind: Kind::Laptop,
            // Custom is invalid for a laptop and gets remapped to New.
            category: Category::Custom,
            price: "$799".to_string(),
            image: "./assets/bench-node.jpg".to_string(),
            specs: vec![SpecEntry::new("RAM", "8GB DDR4")],
        })
        .unwrap();
    assert!(session.is_dirty());

    let published = session.finish().unwrap();
    let records = extract(&published).unwrap();
    assert_eq!(records.len(), 3);

    let titan = &records[0];
    assert_eq!(titan.name, "Titan Creator Pro");
    assert_eq!(
        titan.promotion,
        Some(Promotion {
            enabled: true,
            original_price: "$2149.00".to_string(),
            sale_price: "$1719.20".to_string(),
            discount: 20,
        })
    );
    assert_eq!(titan.price, "$2149.00");

    // The black-friday card keeps its stored category through the
    // regenerated data-category attribute.
    assert_eq!(records[1].name, "Workhorse Tower");
    assert_eq!(records[1].category, Category::Refurbished);

    let added = &records[2];
    assert_eq!(added.name, "Bench Node");
    assert_eq!(added.kind, Some(Kind::Laptop));
    assert_eq!(added.category, Category::New);
    assert_eq!(added.specs, vec![SpecEntry::new("RAM", "8GB DDR4")]);
}

#[test]
fn session_errors_leave_collection_untouched() {
    let mut session = Session::load(FIXTURE.to_string()).unwrap();
    let before = session.records().to_vec();

    assert!(matches!(
        session.promote(99, 20),
        Err(Error::RecordNotFound(99))
    ));
    assert!(matches!(
        session.promote(0, 51),
        Err(Error::DiscountOutOfRange(51))
    ));
    assert_eq!(session.records(), &before[..]);
    assert!(!session.is_dirty());
}

#[test]
fn update_clears_running_promotion() {
    let mut session = Session::load(FIXTURE.to_string()).unwrap();
    assert!(session.records()[2].promotion.is_some());

    session
        .update(
            2,
            RecordDraft {
                name: "Workhorse Tower R2".to_string(),
                kind: Kind::Desktop,
                category: Category::Refurbished,
                price: "$2,299".to_string(),
                image: "./assets/workhorse.jpg".to_string(),
                specs: vec![SpecEntry::new("Processor", "AMD Ryzen 9 7900X")],
            },
        )
        .unwrap();

    let record = &session.records()[2];
    assert_eq!(record.name, "Workhorse Tower R2");
    assert!(record.promotion.is_none());
    assert_eq!(record.price, "$2,299");
}
