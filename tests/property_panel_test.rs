use std::rc::Rc;

use artwork_ngin::{
    Projection,
    editor::{ArtworkProperty, Editor, InputKind, PropertyError, PropertyPanel, PropertyValue},
};

use crate::common::test_utils::{FakeLoader, TestEditor, fake_node, init_logger};

mod common;

fn editor_with(loader: &Rc<FakeLoader>) -> TestEditor {
    TestEditor::new(fake_node(loader))
}

#[test]
fn should_list_fields_in_form_order() {
    let panel = PropertyPanel::artwork();
    let labels: Vec<&str> = panel.fields().iter().map(|field| field.label).collect();
    assert_eq!(
        labels,
        vec![
            "Artwork Url",
            "Width",
            "Height",
            "Projection",
            "Artwork Title",
            "Artwork Artist",
            "Artwork Medium",
            "Artwork Style",
            "Artwork Year",
            "Description",
            "Website Url",
        ]
    );
    assert_eq!(panel.description, "Add an artwork image.");
    assert_eq!(panel.icon, "image");

    assert_eq!(panel.field(ArtworkProperty::Src).unwrap().kind, InputKind::Image);
    match &panel.field(ArtworkProperty::Width).unwrap().kind {
        InputKind::Numeric {
            min,
            small_step,
            medium_step,
            large_step,
            unit,
        } => {
            assert_eq!(*min, 0.0);
            assert_eq!((*small_step, *medium_step, *large_step), (0.1, 1.0, 10.0));
            assert_eq!(*unit, "m");
        }
        other => panic!("width should be numeric, is {other:?}"),
    }
    assert_eq!(
        panel.field(ArtworkProperty::Projection).unwrap().kind,
        InputKind::Choice(&[Projection::Flat, Projection::Equirectangular360])
    );
}

#[test]
fn should_read_live_values_from_selection() {
    let loader = Rc::new(FakeLoader::default());
    let mut editor = editor_with(&loader);
    let panel = PropertyPanel::artwork();

    let view = panel.view(&editor).unwrap();
    assert_eq!(view.len(), 11);
    assert_eq!(view[0].value, PropertyValue::Text(String::new()));
    assert_eq!(view[1].value, PropertyValue::Number(1.0));

    editor.selection.as_mut().unwrap().set_title("Water Lilies");
    editor.selection.as_mut().unwrap().set_width(2.5);

    let view = panel.view(&editor).unwrap();
    let title = view
        .iter()
        .find(|field| field.property == ArtworkProperty::Title)
        .unwrap();
    assert_eq!(title.value, PropertyValue::from("Water Lilies"));
    assert_eq!(view[1].value, PropertyValue::Number(2.5));
    assert_eq!(view[3].value, PropertyValue::Projection(Projection::Flat));
}

#[test]
fn should_dispatch_exactly_one_command_per_change() {
    init_logger();
    let loader = Rc::new(FakeLoader::default());
    let mut editor = editor_with(&loader);
    let panel = PropertyPanel::artwork();

    panel
        .on_change(&mut editor, ArtworkProperty::Title, "Starry Night".into())
        .unwrap();
    assert_eq!(
        editor.commands,
        vec![(ArtworkProperty::Title, PropertyValue::from("Starry Night"))]
    );
    assert_eq!(editor.node().title(), "Starry Night");

    panel
        .on_change(&mut editor, ArtworkProperty::Year, "1889".into())
        .unwrap();
    assert_eq!(editor.commands.len(), 2);
    assert_eq!(editor.node().year(), "1889");
}

#[test]
fn should_load_image_when_url_changes() {
    let loader = Rc::new(FakeLoader::default().with_image("lilies.jpg", 300, 100));
    let mut editor = editor_with(&loader);
    let panel = PropertyPanel::artwork();
    panel
        .on_change(&mut editor, ArtworkProperty::Width, 3.0f32.into())
        .unwrap();

    panel
        .on_change(&mut editor, ArtworkProperty::Src, "lilies.jpg".into())
        .unwrap();

    let node = editor.node();
    assert_eq!(node.src(), Some("lilies.jpg"));
    assert!(node.display().unwrap().visible);
    assert!((node.display().unwrap().scale().y - 1.0).abs() < 1e-5);
    assert_eq!(loader.calls(), vec!["lilies.jpg".to_string()]);
}

#[test]
fn should_switch_projection_from_choice() {
    let loader = Rc::new(FakeLoader::default());
    let mut editor = editor_with(&loader);
    let panel = PropertyPanel::artwork();

    panel
        .on_change(
            &mut editor,
            ArtworkProperty::Projection,
            PropertyValue::from("360-equirectangular"),
        )
        .unwrap();
    assert_eq!(editor.node().projection(), Projection::Equirectangular360);
    assert_eq!(
        editor.commands[0].1,
        PropertyValue::Projection(Projection::Equirectangular360)
    );

    panel
        .on_change(&mut editor, ArtworkProperty::Projection, Projection::Flat.into())
        .unwrap();
    assert_eq!(editor.node().projection(), Projection::Flat);
}

#[test]
fn should_clamp_lengths_to_minimum() {
    let loader = Rc::new(FakeLoader::default());
    let mut editor = editor_with(&loader);
    let panel = PropertyPanel::artwork();

    panel
        .on_change(&mut editor, ArtworkProperty::Width, (-3.0f32).into())
        .unwrap();
    assert_eq!(editor.commands[0].1, PropertyValue::Number(0.0));
    assert_eq!(editor.node().width(), 0.0);

    panel
        .on_change(&mut editor, ArtworkProperty::Height, f32::NAN.into())
        .unwrap();
    assert_eq!(editor.node().height(), 0.0);
}

#[test]
fn should_reject_mismatched_values_without_dispatching() {
    let loader = Rc::new(FakeLoader::default());
    let mut editor = editor_with(&loader);
    let panel = PropertyPanel::artwork();

    let err = panel
        .on_change(&mut editor, ArtworkProperty::Width, "wide".into())
        .unwrap_err();
    assert_eq!(
        err,
        PropertyError::TypeMismatch {
            property: ArtworkProperty::Width,
            expected: "number",
            actual: "text",
        }
    );

    let err = panel
        .on_change(&mut editor, ArtworkProperty::Projection, "fisheye".into())
        .unwrap_err();
    assert!(matches!(err, PropertyError::TypeMismatch { .. }));

    let err = panel
        .on_change(&mut editor, ArtworkProperty::Title, 4.0f32.into())
        .unwrap_err();
    assert_eq!(err.to_string(), "property title expects a text value, got a number value");

    assert!(editor.commands.is_empty());
    assert_eq!(editor.node().width(), 1.0);
}

#[test]
fn should_fail_without_selection() {
    let loader = Rc::new(FakeLoader::default());
    let mut editor = editor_with(&loader);
    editor.selection = None;
    let panel = PropertyPanel::artwork();

    assert_eq!(panel.view(&editor), Err(PropertyError::NoSelection));
    assert_eq!(
        panel.on_change(&mut editor, ArtworkProperty::Title, "x".into()),
        Err(PropertyError::NoSelection)
    );
    assert!(editor.commands.is_empty());
    assert!(editor.get_property_selected(ArtworkProperty::Title).is_none());
}

#[test]
fn should_reject_properties_missing_from_panel() {
    let loader = Rc::new(FakeLoader::default());
    let mut editor = editor_with(&loader);
    for property in ArtworkProperty::ALL {
        assert!(PropertyPanel::artwork().field(property).is_some(), "{property}");
    }

    let panel = PropertyPanel::artwork().without(ArtworkProperty::Url);
    assert_eq!(panel.fields().len(), 10);
    assert_eq!(
        panel.on_change(&mut editor, ArtworkProperty::Url, "u".into()),
        Err(PropertyError::NotInPanel(ArtworkProperty::Url))
    );
    assert!(editor.commands.is_empty());
    assert_eq!(editor.node().url(), "");
}

#[test]
fn should_set_properties_on_node_directly() {
    let loader = Rc::new(FakeLoader::default());
    let mut node = fake_node(&loader);

    assert!(
        node.set_property(ArtworkProperty::Medium, "Tempera".into())
            .unwrap()
            .is_none()
    );
    assert_eq!(node.get_property(ArtworkProperty::Medium), PropertyValue::from("Tempera"));

    let pending = node
        .set_property(ArtworkProperty::Src, "a.png".into())
        .unwrap();
    assert_eq!(pending.unwrap().src(), "a.png");
    assert!(node.is_loading());

    assert_eq!(
        node.set_property(ArtworkProperty::Projection, 1.0f32.into()).unwrap_err(),
        PropertyError::TypeMismatch {
            property: ArtworkProperty::Projection,
            expected: "projection",
            actual: "number",
        }
    );
}

#[test]
fn should_parse_property_names() {
    for property in ArtworkProperty::ALL {
        assert_eq!(property.name().parse::<ArtworkProperty>().unwrap(), property);
    }
    assert_eq!(
        "colour".parse::<ArtworkProperty>(),
        Err(PropertyError::UnknownProperty("colour".to_string()))
    );
}
