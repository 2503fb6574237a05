use super::{Dialect, DirectiveKind, collection_group_name, split_braced};
use crate::{CollectionKind, CollectionSet, CompileError, FieldId, Record, Target, apache, ncsa};

fn dialects() -> [&'static Dialect; 2] {
    [Dialect::ncsa(), Dialect::apache()]
}

#[test]
fn every_directive_compiles_alone_with_all_bindings_resolved() {
    for dialect in dialects() {
        for directive in dialect.directives() {
            let spec = format!("%{directive}");
            let format = dialect
                .compile(&spec)
                .unwrap_or_else(|e| panic!("{}: '{spec}' failed to compile: {e}", dialect.name()));

            let bindings = dialect.bindings(directive);
            assert!(!bindings.is_empty(), "{}: '{directive}' has no bindings", dialect.name());
            for (group, id) in bindings {
                assert!(format.has_field(*id), "{}: '{directive}' leaves {group} unbound", dialect.name());
            }
        }
    }
}

#[test]
fn every_binding_names_a_group_of_its_fragment() {
    for dialect in dialects() {
        for directive in dialect.directives() {
            let pattern = dialect.pattern(directive, "");
            for (group, _) in dialect.bindings(directive) {
                assert!(pattern.contains(&format!("(?P<{group}>")), "'{directive}' lacks group {group}");
            }
        }
    }
}

#[test]
fn base_fields_are_unchanged_in_the_extended_dialect() {
    let base = Dialect::ncsa();
    let extended = Dialect::apache();

    assert_eq!(base.field_count(), ncsa::NUM_FIELDS);
    assert_eq!(extended.field_count(), apache::NUM_FIELDS);
    for idx in 0..ncsa::NUM_FIELDS {
        let id = FieldId(idx);
        assert_eq!(base.field_name(id), extended.field_name(id), "field {id}");
    }
    for directive in base.directives() {
        assert_eq!(base.pattern(directive, ""), extended.pattern(directive, ""), "'{directive}'");
        assert_eq!(base.bindings(directive), extended.bindings(directive), "'{directive}'");
    }
}

#[test]
fn extended_ids_continue_after_the_base() {
    assert_eq!(apache::REMOTE_IP.index(), ncsa::NUM_FIELDS);
    assert_eq!(apache::CONTENT_LENGTH.index(), apache::NUM_FIELDS - 1);

    let cases: Vec<(FieldId, &str)> = vec![
        (ncsa::REMOTE_HOST, "remoteHost"),
        (ncsa::STATUS, "status"),
        (ncsa::URL_ROOT, "requestUrlRoot"),
        (apache::REMOTE_IP, "remoteIp"),
        (apache::DURATION_USEC, "durationUsec"),
        (apache::CONNECTION_STATUS, "connectionStatus"),
        (apache::REFERER, "referer"),
        (apache::CONTENT_LENGTH, "contentLength"),
    ];
    for (id, name) in cases {
        assert_eq!(Dialect::apache().field_name(id), Some(name));
        assert_eq!(Dialect::apache().field_id(name), Some(id));
    }
    assert_eq!(Dialect::ncsa().field_name(apache::REMOTE_IP), None);
}

#[test]
fn base_field_values_match_through_both_dialects() {
    let line = "10.0.0.7 - alice [05/Mar/2021:07:01:02 +0100] \"POST /submit?id=3 HTTP/1.1\" 201 17";
    let base = Dialect::ncsa().compile(ncsa::COMMON_FORMAT).unwrap();
    let extended = Dialect::apache().compile(ncsa::COMMON_FORMAT).unwrap();
    let a = Record::new(&base, line, None).unwrap();
    let b = Record::new(&extended, line, None).unwrap();

    for idx in 0..ncsa::NUM_FIELDS {
        let id = FieldId(idx);
        assert_eq!(base.field_name(id), extended.field_name(id));
        assert_eq!(a.field(id), b.field(id), "field {id}");
    }
    assert_eq!(b.status().unwrap(), 201);
    assert_eq!(b.query_string().unwrap(), "?id=3");
}

#[test]
fn classification_of_braced_directives() {
    let apache = Dialect::apache();

    assert!(matches!(
        apache.classify("{Referer}i"),
        DirectiveKind::Exceptional(_, CollectionKind::InputHeader, "Referer")
    ));
    assert!(matches!(
        apache.classify("{Content-length}o"),
        DirectiveKind::Exceptional(_, CollectionKind::OutputHeader, "Content-length")
    ));
    assert!(matches!(apache.classify("{Host}i"), DirectiveKind::Collection(CollectionKind::InputHeader, "Host")));
    assert!(matches!(apache.classify("{HOME}e"), DirectiveKind::Collection(CollectionKind::Environment, "HOME")));
    assert!(matches!(apache.classify("{sid}C"), DirectiveKind::Collection(CollectionKind::Cookie, "sid")));
    assert!(matches!(apache.classify("{sid}c"), DirectiveKind::Unknown));
    assert!(matches!(apache.classify("{%Y}t"), DirectiveKind::Unknown));
    assert!(matches!(apache.classify(">s"), DirectiveKind::Fixed(_)));
    assert!(matches!(apache.classify("Z"), DirectiveKind::Unknown));

    // The base dialect declares no collections.
    assert_eq!(Dialect::ncsa().collections(), CollectionSet::empty());
    assert!(matches!(Dialect::ncsa().classify("{Host}i"), DirectiveKind::Unknown));
}

#[test]
fn resolution_per_directive_kind() {
    let apache = Dialect::apache();

    let resolved = apache.resolve("{Referer}i", "(.*)");
    assert_eq!(resolved.pattern, r"(?P<_Referer_i>[^\s]+|-)");
    let targets: Vec<&Target> = resolved.bindings.iter().map(|(_, t)| t).collect();
    assert_eq!(
        targets,
        vec![&Target::Field(apache::REFERER), &Target::Collection(CollectionKind::InputHeader, "Referer".to_string())]
    );

    let resolved = apache.resolve("{X-Forwarded-For}i", "(.*)");
    assert_eq!(resolved.pattern, "(?P<_X_Forwarded_For_i>.*)");
    assert!(!resolved.fallback);

    assert_eq!(apache.pattern("{Host}i", "(.*)"), "(?P<_Host_i>.*)");
    assert_eq!(apache.pattern("{foo}x", "(.*)"), "(.*)");
    assert!(apache.bindings("{Host}i").is_empty());

    let resolved = apache.resolve("{foo}x", "(.*)");
    assert_eq!(resolved.pattern, "(.*)");
    assert!(resolved.fallback);
    assert!(resolved.bindings.is_empty());
}

#[test]
fn collection_keys_round_trip_through_compiled_formats() {
    let format = Dialect::apache().compile("%{X}i").unwrap();
    assert!(format.has_collection_field(CollectionKind::InputHeader, "X"));
    assert!(!format.has_collection_field(CollectionKind::InputHeader, "Y"));
    assert!(!format.has_collection_field(CollectionKind::OutputHeader, "X"));

    let record = Record::new(&format, "value", None).unwrap();
    assert_eq!(record.input_header("X").unwrap(), "value");
    assert!(record.input_header("Y").is_err());
}

#[test]
fn unknown_directives_capture_without_binding() {
    // `%Dusec` is one unknown identifier in the base grammar.
    let format = Dialect::ncsa().compile("%Dusec %h").unwrap();
    assert_eq!(format.pattern(), r"^(.*) (?P<remoteHost>[^\s]*)");
    assert_eq!(format.bound_fields().collect::<Vec<_>>(), vec![ncsa::REMOTE_HOST]);
}

#[test]
fn base_dialect_rejects_braced_directives() {
    assert!(matches!(Dialect::ncsa().compile("%{Referer}i"), Err(CompileError::InvalidDirective { .. })));
}

#[test]
fn group_names_are_derived_from_directive_text() {
    let cases = [
        ("{User-agent}i", "_User_agent_i"),
        ("{Content-type}o", "_Content_type_o"),
        ("{session_id}C", "_session_id_C"),
        ("{HOME}e", "_HOME_e"),
    ];
    for (directive, expected) in cases {
        assert_eq!(collection_group_name(directive), expected);
    }
}

#[test]
fn braced_split() {
    assert_eq!(split_braced("{Referer}i"), Some(("Referer", 'i')));
    assert_eq!(split_braced("{}i"), None);
    assert_eq!(split_braced("{a}"), None);
    assert_eq!(split_braced("{a}ix"), None);
    assert_eq!(split_braced(">s"), None);
}

#[test]
fn presets() {
    let apache = Dialect::apache();
    assert_eq!(apache.preset("common"), Some(ncsa::COMMON_FORMAT));
    assert_eq!(apache.preset("vcommon"), Some("%v %h %l %u %t \"%r\" %>s %b"));
    assert_eq!(apache.preset("combined"), Some("%h %l %u %t \"%r\" %>s %b \"%{Referer}i\" \"%{User-agent}i\""));
    assert_eq!(apache.preset("extended"), apache.preset("combined"));
    assert_eq!(apache.resolve_spec("%h"), "%h");
    assert!(Dialect::ncsa().presets().is_empty());
    for (name, _) in apache.presets() {
        assert!(apache.compile(name).is_ok(), "preset {name}");
    }
}

#[test]
fn dialects_by_name() {
    assert_eq!(Dialect::by_name("ncsa").map(Dialect::name), Some("ncsa"));
    assert_eq!(Dialect::by_name("apache").map(Dialect::name), Some("apache"));
    assert!(Dialect::by_name("nginx").is_none());
}
