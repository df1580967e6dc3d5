//! YAML text round trips.

use treeconf::{Config, Literal};
use treeconf_yaml::{parse, parse_literal, to_yaml_string};

fn round_trip(config: &Config) -> Config {
    parse(&to_yaml_string(config).unwrap()).unwrap()
}

#[test]
fn test_pretty_list() {
    let config = Config::create(Literal::sequence([
        Literal::from("item1"),
        Literal::from("item2"),
        Literal::mapping([("key3", "value3")]),
    ]))
    .unwrap();
    let expected = "- item1\n- item2\n- key3: value3\n";
    assert_eq!(to_yaml_string(&config).unwrap(), expected);
    assert_eq!(parse(expected).unwrap(), config);
}

#[test]
fn test_list_value_from_text() {
    let config = parse("a: [1,2]").unwrap();
    assert!(config == Literal::mapping([("a", Literal::sequence([1, 2]))]));
}

#[test]
fn test_list_from_flow_text() {
    let config = parse("[1,2,3]").unwrap();
    assert!(!config.is_empty());
    assert_eq!(config.to_string(), "[1, 2, 3]");
}

#[test]
fn test_round_trips() {
    let cases = [
        Literal::Sequence(Vec::new()),
        Literal::Mapping(Default::default()),
        Literal::sequence([
            Literal::from(1),
            Literal::from("two"),
            Literal::from(3.25),
            Literal::mapping([("k", "v")]),
            Literal::Null,
        ]),
        Literal::sequence([Literal::mapping([(
            "outer",
            Literal::mapping([("inner", Literal::sequence([true, false]))]),
        )])]),
        Literal::mapping([
            ("required", Literal::from("???")),
            ("number_like", Literal::from("123")),
            ("interp", Literal::from("${required}")),
        ]),
    ];
    for literal in cases {
        let config = Config::create(literal.clone()).unwrap();
        let reparsed = round_trip(&config);
        assert_eq!(reparsed.to_literal(), literal);
        assert_eq!(reparsed, config);
    }
}

#[test]
fn test_parse_literal_matches_builder() {
    let literal = parse_literal("a:\n  - 1\n  - x\nb: ~\n").unwrap();
    assert_eq!(
        literal,
        Literal::mapping([
            ("a", Literal::sequence([Literal::from(1), Literal::from("x")])),
            ("b", Literal::Null),
        ])
    );
}
