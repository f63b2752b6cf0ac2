use dach_core::{
    CountryOption, InitialSelection, MemoryElement, MemoryStore, MemoryTree, NoStore, Switch,
    SwitchConfig, Visibility,
};

const KEY: &str = "dach-switch-selection";

fn dach_page() -> MemoryTree {
    MemoryTree::from_elements([
        MemoryElement::new("div").attr("id", "de-item").attr("class", "item").attr("data-country", "DE"),
        MemoryElement::new("div").attr("id", "at-item").attr("class", "item").attr("data-country", "AT"),
        MemoryElement::new("div").attr("id", "ch-item").attr("class", "item").attr("data-country", "CH"),
        MemoryElement::new("div").attr("id", "plain"),
    ])
}

fn configs() -> Vec<SwitchConfig> {
    vec![
        SwitchConfig::default(),
        SwitchConfig {
            countries: vec![
                CountryOption::new("Ger", "DE").with_accepted_codes(["deu"]),
                CountryOption::new("Fra", "FR"),
            ],
            country_code_attribute: "lang".to_string(),
            ..SwitchConfig::default()
        },
        SwitchConfig {
            target_selector: Some(".item, #plain".to_string()),
            show_all_toggle: false,
            ..SwitchConfig::default()
        },
    ]
}

fn display_of(tree: &MemoryTree, id: &str) -> String {
    tree.by_id(id).map(|el| el.display().to_string()).unwrap_or_default()
}

#[test]
fn all_active_mount_shows_everything() {
    for config in configs() {
        let attribute = config.country_code_attribute.clone();
        let switch = Switch::mount(config, NoStore).unwrap();
        let mut tree = MemoryTree::from_elements(switch.config().countries.iter().map(|option| {
            MemoryElement::new("div")
                .attr("id", &option.label)
                .attr("class", "item")
                .attr(&attribute, &option.code)
        }));
        switch.filter(&mut tree);

        assert!(switch.is_all_selected());
        if let Some(toggle) = switch.all_toggle() {
            assert!(toggle.pressed);
        }
        assert!(tree.elements().iter().all(|el| el.is_visible()));
    }
}

#[test]
fn multi_select_toggle_round_trip() {
    for config in configs() {
        let labels: Vec<String> = config.labels().map(str::to_string).collect();
        let mut switch = Switch::mount(config, NoStore).unwrap();

        for label in &labels {
            let before: Vec<String> = switch.active_labels().to_vec();
            switch.toggle(label).unwrap();
            assert_ne!(switch.is_active(label), before.contains(label));
            for other in labels.iter().filter(|l| *l != label) {
                assert_eq!(switch.is_active(other), before.contains(other));
            }

            switch.toggle(label).unwrap();
            let mut after: Vec<String> = switch.active_labels().to_vec();
            let mut expected = before.clone();
            after.sort();
            expected.sort();
            assert_eq!(after, expected);
        }
    }
}

#[test]
fn single_select_always_yields_one_label() {
    let config = SwitchConfig {
        single_select: true,
        ..SwitchConfig::default()
    };
    let mut switch = Switch::mount(config, NoStore).unwrap();
    for label in ["A", "A", "CH", "D"] {
        switch.toggle(label).unwrap();
        assert_eq!(switch.active_labels(), [label]);
    }
}

#[test]
fn master_toggle_two_press_round_trip() {
    let mut switch = Switch::mount(SwitchConfig::default(), NoStore).unwrap();
    let mut tree = dach_page();

    switch.toggle_all();
    assert!(switch.active_labels().is_empty());
    switch.filter(&mut tree);
    assert_eq!(display_of(&tree, "de-item"), "none");

    switch.toggle_all();
    assert!(switch.is_all_selected());
    switch.filter(&mut tree);
    assert_eq!(display_of(&tree, "de-item"), "");
}

#[test]
fn persisted_selection_mirrors_state_and_survives_remount() {
    let config = SwitchConfig {
        persist: true,
        default_all_active: false,
        default_active: InitialSelection::One("CH".to_string()),
        ..SwitchConfig::default()
    };

    let mut switch = Switch::mount(config.clone(), MemoryStore::new()).unwrap();
    assert_eq!(switch.active_labels(), ["CH"]);

    for step in ["D", "CH", "A"] {
        switch.toggle(step).unwrap();
        let stored: Vec<String> = serde_json::from_str(switch.store().get(KEY).unwrap()).unwrap();
        assert_eq!(stored, switch.active_labels());
    }

    let expected = switch.active_labels().to_vec();
    let store = switch.into_store();
    let fresh = Switch::mount(config, store).unwrap();
    assert_eq!(fresh.active_labels(), expected.as_slice());
}

#[test]
fn deactivating_austria_hides_only_at() {
    let mut switch = Switch::mount(SwitchConfig::default(), NoStore).unwrap();
    let mut tree = dach_page();

    let report = switch.filter(&mut tree);
    assert_eq!(report.visible_count(), 3);

    switch.toggle("A").unwrap();
    let report = switch.filter(&mut tree);
    assert_eq!(report.visibility_of("at-item"), Some(Visibility::Hidden));
    assert_eq!(display_of(&tree, "de-item"), "");
    assert_eq!(display_of(&tree, "at-item"), "none");
    assert_eq!(display_of(&tree, "ch-item"), "");
}

#[test]
fn custom_attribute_matches_case_insensitively() {
    let config = SwitchConfig {
        country_code_attribute: "lang".to_string(),
        countries: vec![CountryOption::new("Ger", "DE")],
        default_all_active: false,
        default_active: InitialSelection::One("Ger".to_string()),
        ..SwitchConfig::default()
    };
    let switch = Switch::mount(config, NoStore).unwrap();
    let mut tree = MemoryTree::from_elements([
        MemoryElement::new("div").attr("id", "upper").attr("lang", "DE"),
        MemoryElement::new("div").attr("id", "lower").attr("lang", "de"),
        MemoryElement::new("div").attr("id", "at").attr("lang", "AT"),
    ]);
    switch.filter(&mut tree);

    assert_eq!(display_of(&tree, "upper"), "");
    assert_eq!(display_of(&tree, "lower"), "");
    assert_eq!(display_of(&tree, "at"), "none");
}

#[test]
fn element_without_attribute_is_always_visible() {
    let config = SwitchConfig {
        target_selector: Some("div".to_string()),
        ..SwitchConfig::default()
    };
    let mut switch = Switch::mount(config, NoStore).unwrap();
    let mut tree = dach_page();

    let check = |switch: &Switch<NoStore>, tree: &mut MemoryTree| {
        switch.filter(tree);
        assert_eq!(display_of(tree, "plain"), "");
    };

    check(&switch, &mut tree);
    switch.toggle_all();
    check(&switch, &mut tree);
    switch.toggle("A").unwrap();
    check(&switch, &mut tree);
    switch.toggle_all();
    check(&switch, &mut tree);
}

#[test]
fn default_code_maps_to_label_for_custom_attribute() {
    let config = SwitchConfig {
        country_code_attribute: "lang".to_string(),
        default_all_active: false,
        default_active: InitialSelection::One("D".to_string()),
        ..SwitchConfig::default()
    };
    let switch = Switch::mount(config, NoStore).unwrap();
    let mut tree = MemoryTree::from_elements([
        MemoryElement::new("div").attr("id", "custom-de").attr("lang", "DE"),
        MemoryElement::new("div").attr("id", "custom-at").attr("lang", "AT"),
    ]);
    switch.filter(&mut tree);
    assert_eq!(display_of(&tree, "custom-de"), "");
    assert_eq!(display_of(&tree, "custom-at"), "none");
}

#[test]
fn null_default_active_falls_back_to_every_label() {
    let config = SwitchConfig::from_json(r#"{"defaultAllActive": false, "defaultActive": null}"#).unwrap();
    let switch = Switch::mount(config, NoStore).unwrap();
    assert!(switch.is_all_selected());

    let mut page = dach_page();
    switch.filter(&mut page);
    assert_eq!(display_of(&page, "at-item"), "");
}
