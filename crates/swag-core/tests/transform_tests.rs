use serde_json::json;
use swag_core::{
    Direction, FieldDescriptor, MappedValue, ShapeMismatch, Transformer, TypeDescriptor,
    TypeRegistry,
};

fn company_registry() -> TypeRegistry {
    TypeRegistry::builder()
        .define(
            "Company",
            TypeDescriptor::object(
                vec![
                    FieldDescriptor::new("Id", "id", TypeDescriptor::number()),
                    FieldDescriptor::new("Name", "name", TypeDescriptor::string()),
                    FieldDescriptor::new(
                        "Founded",
                        "founded",
                        TypeDescriptor::optional(TypeDescriptor::Date),
                    ),
                    FieldDescriptor::new(
                        "Offices",
                        "offices",
                        TypeDescriptor::optional(TypeDescriptor::array(
                            TypeDescriptor::reference("Office"),
                        )),
                    ),
                    FieldDescriptor::new(
                        "Parent",
                        "parent",
                        TypeDescriptor::optional(TypeDescriptor::union([
                            TypeDescriptor::Null,
                            TypeDescriptor::reference("Company"),
                        ])),
                    ),
                ],
                TypeDescriptor::Invalid,
            ),
        )
        .define(
            "Office",
            TypeDescriptor::object(
                vec![
                    FieldDescriptor::new("City", "city", TypeDescriptor::string()),
                    FieldDescriptor::new("Kind", "kind", TypeDescriptor::reference("OfficeKind")),
                ],
                TypeDescriptor::any(),
            ),
        )
        .define(
            "OfficeKind",
            TypeDescriptor::enumeration(["headquarters", "branch"]),
        )
        .define("CompanyAlias", TypeDescriptor::reference("Company"))
        .build()
        .expect("registry should build")
}

fn decode(registry: &TypeRegistry, name: &str, value: serde_json::Value) -> Result<MappedValue, ShapeMismatch> {
    Transformer::new(registry).cast(&value, name)
}

#[test]
fn decode_then_encode_round_trips() {
    let registry = company_registry();
    let t = Transformer::new(&registry);
    let wire = json!({
        "Id": 7,
        "Name": "Acme",
        "Offices": [
            {"City": "Oslo", "Kind": "headquarters", "Floor": 3},
            {"City": "Bergen", "Kind": "branch"}
        ],
        "Parent": {"Id": 1, "Name": "Holding", "Parent": null}
    });

    let decoded = t.cast(&wire, "Company").unwrap();
    assert_eq!(
        decoded.to_json(),
        json!({
            "id": 7,
            "name": "Acme",
            "offices": [
                {"city": "Oslo", "kind": "headquarters", "Floor": 3},
                {"city": "Bergen", "kind": "branch"}
            ],
            "parent": {"id": 1, "name": "Holding", "parent": null}
        })
    );

    let encoded = t.uncast(&decoded, "Company").unwrap();
    assert_eq!(encoded, wire);
}

#[test]
fn encode_then_decode_round_trips() {
    let registry = company_registry();
    let t = Transformer::new(&registry);
    let ty = TypeDescriptor::reference("Company");
    let internal = MappedValue::from(json!({"id": 2, "name": "Beta", "offices": []}));

    let wire = t.encode(&internal, &ty).unwrap();
    assert_eq!(wire.to_json(), json!({"Id": 2, "Name": "Beta", "Offices": []}));
    assert_eq!(t.decode(&wire, &ty).unwrap(), internal);
}

#[test]
fn encoded_keys_follow_declaration_order() {
    let registry = company_registry();
    let t = Transformer::new(&registry);
    let internal = MappedValue::from(json!({
        "offices": [{"kind": "branch", "Extra": true, "city": "Oslo"}],
        "name": "Acme",
        "id": 1
    }));
    let wire = t.uncast(&internal, "Company").unwrap();
    insta::assert_snapshot!(
        wire.to_string(),
        @r#"{"Id":1,"Name":"Acme","Offices":[{"City":"Oslo","Kind":"branch","Extra":true}]}"#
    );
}

#[test]
fn alias_chain_is_followed() {
    let registry = company_registry();
    let decoded = decode(&registry, "CompanyAlias", json!({"Id": 1, "Name": "A"})).unwrap();
    assert_eq!(decoded.to_json(), json!({"id": 1, "name": "A"}));
}

#[test]
fn mismatches_never_return_partial_results() {
    let registry = company_registry();
    // Second office has a kind outside the enumeration.
    let err = decode(
        &registry,
        "Company",
        json!({
            "Id": 1,
            "Name": "A",
            "Offices": [
                {"City": "Oslo", "Kind": "branch"},
                {"City": "Rome", "Kind": "warehouse"}
            ]
        }),
    )
    .unwrap_err();
    assert!(matches!(err.expected, TypeDescriptor::Union(_)));
}

#[test]
fn wrong_kinds_are_rejected() {
    let registry = company_registry();
    let cases = [
        json!({"Id": "1", "Name": "A"}),
        json!({"Id": 1, "Name": 5}),
        json!({"Id": 1, "Name": "A", "Offices": {"City": "Oslo"}}),
        json!([{"Id": 1, "Name": "A"}]),
        json!(null),
        json!("Acme"),
    ];
    for case in cases {
        assert!(
            decode(&registry, "Company", case.clone()).is_err(),
            "expected mismatch for {case}"
        );
    }
}

#[test]
fn closed_object_rejects_unknown_keys() {
    let registry = company_registry();
    let err = decode(&registry, "Company", json!({"Id": 1, "Name": "A", "Rogue": 1})).unwrap_err();
    assert!(matches!(err.expected, TypeDescriptor::Invalid));
    assert_eq!(err.value, Some(MappedValue::from(json!(1))));
}

#[test]
fn union_first_successful_alternative_wins() {
    let registry = TypeRegistry::default();
    let t = Transformer::new(&registry);
    let open_a = TypeDescriptor::object(
        vec![FieldDescriptor::new("v", "from_a", TypeDescriptor::number())],
        TypeDescriptor::any(),
    );
    let open_b = TypeDescriptor::object(
        vec![FieldDescriptor::new("v", "from_b", TypeDescriptor::number())],
        TypeDescriptor::any(),
    );
    let value = MappedValue::from(json!({"v": 1}));

    let ab = TypeDescriptor::union([open_a.clone(), open_b.clone()]);
    assert_eq!(t.decode(&value, &ab).unwrap().to_json(), json!({"from_a": 1}));

    let ba = TypeDescriptor::union([open_b, open_a]);
    assert_eq!(t.decode(&value, &ba).unwrap().to_json(), json!({"from_b": 1}));
}

#[test]
fn union_failure_references_all_alternatives() {
    let registry = TypeRegistry::default();
    let ty = TypeDescriptor::union([TypeDescriptor::number(), TypeDescriptor::boolean()]);
    let err = Transformer::new(&registry)
        .decode(&MappedValue::from(json!("x")), &ty)
        .unwrap_err();
    assert_eq!(err.to_string(), r#"invalid value "x" for type union[number | boolean]"#);
}

#[test]
fn enumeration_accepts_only_listed_literals() {
    let registry = TypeRegistry::default();
    let t = Transformer::new(&registry);
    let ty = TypeDescriptor::enumeration(["date-time", "int32"]);
    assert!(t.decode(&MappedValue::from(json!("int32")), &ty).is_ok());
    assert!(t.decode(&MappedValue::from(json!("int64")), &ty).is_err());
}

#[test]
fn additional_keys_pass_through_unchanged() {
    let registry = TypeRegistry::default();
    let ty = TypeDescriptor::object(
        vec![FieldDescriptor::new("Id", "id", TypeDescriptor::number())],
        TypeDescriptor::any(),
    );
    let decoded = Transformer::new(&registry)
        .decode(&MappedValue::from(json!({"Id": 1, "Extra": "x"})), &ty)
        .unwrap();
    assert_eq!(decoded.to_json(), json!({"id": 1, "Extra": "x"}));
}

#[test]
fn date_rules() {
    let registry = TypeRegistry::default();
    let t = Transformer::new(&registry);
    let ty = TypeDescriptor::Date;

    assert_eq!(
        t.decode(&MappedValue::from(json!(null)), &ty).unwrap(),
        MappedValue::Null
    );

    let decoded = t
        .decode(&MappedValue::from(json!("2024-01-01T00:00:00Z")), &ty)
        .unwrap();
    assert!(decoded.as_date().is_some());

    let err = t
        .decode(&MappedValue::from(json!(1700000000000_i64)), &ty)
        .unwrap_err();
    assert_eq!(err.value, Some(MappedValue::from(json!(1700000000000_i64))));

    assert!(t.decode(&MappedValue::from(json!("yesterday")), &ty).is_err());
    assert!(t.decode(&MappedValue::from(json!(true)), &ty).is_err());
}

#[test]
fn date_round_trip_compares_by_instant() {
    let registry = TypeRegistry::default();
    let t = Transformer::new(&registry);
    let ty = TypeDescriptor::object(
        vec![FieldDescriptor::new("At", "at", TypeDescriptor::Date)],
        TypeDescriptor::Invalid,
    );
    let decoded = t
        .decode(&MappedValue::from(json!({"At": "2024-01-01T02:00:00+02:00"})), &ty)
        .unwrap();
    let encoded = t.encode(&decoded, &ty).unwrap();
    assert_eq!(encoded.to_json(), json!({"At": "2024-01-01T00:00:00.000Z"}));

    let again = t.decode(&MappedValue::from(encoded.to_json()), &ty).unwrap();
    assert_eq!(again, decoded);
}

#[test]
fn optional_field_absent_or_wrong() {
    let registry = company_registry();
    assert!(decode(&registry, "Company", json!({"Id": 1, "Name": "A"})).is_ok());
    assert!(decode(&registry, "Company", json!({"Id": 1, "Name": "A", "Founded": 1999})).is_err());
    assert!(decode(&registry, "Company", json!({"Id": 1, "Name": "A", "Offices": "none"})).is_err());
}

#[test]
fn required_field_absent_is_rejected() {
    let registry = company_registry();
    let err = decode(&registry, "Company", json!({"Id": 1})).unwrap_err();
    assert_eq!(err.value, None);
    assert_eq!(err.to_string(), "invalid value undefined for type string");
}

#[test]
fn recursion_follows_data_depth() {
    let registry = company_registry();
    let mut wire = json!({"Id": 0, "Name": "root"});
    for depth in 1..50 {
        wire = json!({"Id": depth, "Name": "child", "Parent": wire});
    }
    let decoded = decode(&registry, "Company", wire.clone()).unwrap();
    let encoded = Transformer::new(&registry).uncast(&decoded, "Company").unwrap();
    assert_eq!(encoded, wire);
}

#[test]
fn validate_and_map_matches_direction_helpers() {
    let registry = company_registry();
    let t = Transformer::new(&registry);
    let ty = TypeDescriptor::reference("Office");
    let value = MappedValue::from(json!({"City": "Oslo", "Kind": "branch"}));
    assert_eq!(
        t.validate_and_map(&value, &ty, Direction::Decode).unwrap(),
        t.decode(&value, &ty).unwrap()
    );
}
