mod common;

use common::fixtures::assert_close;
use riso_scene::{
    config::GrainParams,
    panel::{Control, DebugPanel, PanelKey, Slider},
};
use winit::keyboard::{Key, NamedKey};

fn panel() -> DebugPanel {
    DebugPanel::new(GrainParams::default())
}

#[test]
fn initial_values_are_kept_as_given() {
    let panel = panel();
    // Above the slider maximum of 22, but untouched until edited
    assert_eq!(panel.get(Control::NoiseMax), 22.09);
    assert_eq!(panel.get(Control::NoiseCoef), 2.1);
    assert_eq!(panel.get(Control::Light1X), 10.0);
    assert_eq!(panel.selected(), Some(Control::Light1X));
    assert!(panel.visible);
    assert!(panel.folders.iter().all(|f| f.open));
}

#[test]
fn folders_hold_the_expected_sliders() {
    let panel = panel();
    let names: Vec<&str> = panel.folders.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Lights position X", "Grain"]);

    let labels: Vec<&str> = panel
        .folders
        .iter()
        .flat_map(|f| f.sliders.iter().map(|s| s.control.label()))
        .collect();
    assert_eq!(
        labels,
        vec!["light1X", "light2X", "uNoiseCoef", "uNoiseMin", "uNoiseMax", "uNoiseScale"]
    );
}

#[test]
fn slider_clamps_then_snaps_to_step() {
    let slider = Slider::new(Control::NoiseMin, 0.0, 1.0, 0.1);
    assert_eq!(slider.constrain(0.26), 0.3);
    assert_eq!(slider.constrain(-4.0), 0.0);
    assert_eq!(slider.constrain(7.0), 1.0);
    assert_eq!(slider.decimals(), 1);

    let coarse = Slider::new(Control::NoiseCoef, 0.0, 20.0, 1.0);
    assert_eq!(coarse.decimals(), 0);
    assert_eq!(coarse.constrain(2.6), 3.0);
}

#[test]
fn set_returns_the_whole_controller_when_a_value_changes() {
    let mut panel = panel();

    let params = panel.set(Control::NoiseMax, 30.0).expect("value changed");
    assert_eq!(params.noise_max, 22.0);
    assert_eq!(params.noise_coef, 2.1);
    assert_eq!(params.light1_x, 10.0);

    let params = panel.set(Control::Light2X, -12.0).expect("value changed");
    assert_eq!(params.light2_x, -10.0);
    assert_eq!(panel.params().light2_x, -10.0);

    // Same value after constraining
    assert_eq!(panel.set(Control::Light2X, -10.04), None);
}

#[test]
fn keys_select_and_nudge_the_selected_slider() {
    let mut panel = panel();

    // light1X already sits at its maximum
    assert_eq!(panel.handle(PanelKey::Increase), None);

    let params = panel.handle(PanelKey::Decrease).expect("value changed");
    assert_close(params.light1_x, 9.9);

    panel.handle(PanelKey::Next);
    panel.handle(PanelKey::Next);
    assert_eq!(panel.selected(), Some(Control::NoiseCoef));
    let params = panel.handle(PanelKey::IncreaseLarge).expect("value changed");
    assert_close(params.noise_coef, 3.1);
    let params = panel.handle(PanelKey::DecreaseLarge).expect("value changed");
    assert_close(params.noise_coef, 2.1);
}

#[test]
fn selection_wraps_around() {
    let mut panel = panel();
    panel.handle(PanelKey::Previous);
    assert_eq!(panel.selected(), Some(Control::NoiseScale));
    panel.handle(PanelKey::Next);
    assert_eq!(panel.selected(), Some(Control::Light1X));
}

#[test]
fn hidden_panel_ignores_everything_but_show() {
    let mut panel = panel();
    panel.handle(PanelKey::ToggleVisible);
    assert!(!panel.visible);

    assert_eq!(panel.handle(PanelKey::Decrease), None);
    panel.handle(PanelKey::Next);
    assert_eq!(panel.selected(), Some(Control::Light1X));
    assert_eq!(panel.get(Control::Light1X), 10.0);

    panel.handle(PanelKey::ToggleVisible);
    assert!(panel.visible);
    assert!(panel.handle(PanelKey::Decrease).is_some());
}

#[test]
fn closed_folder_hides_its_sliders_and_blocks_edits() {
    let mut panel = panel();
    panel.handle(PanelKey::ToggleFolder);
    assert!(!panel.folders[0].open);
    assert!(panel.folders[1].open);

    assert_eq!(panel.handle(PanelKey::Decrease), None);
    let text = panel.to_text();
    assert!(text.contains("> Lights position X"));
    assert!(!text.contains("light1X"));
    assert!(text.contains("uNoiseMax"));

    panel.handle(PanelKey::ToggleFolder);
    assert!(panel.to_text().contains("light1X"));
}

#[test]
fn text_marks_the_selected_slider() {
    let mut panel = panel();
    panel.handle(PanelKey::Next);
    let text = panel.to_text();
    let selected = text
        .lines()
        .find(|line| line.contains("light2X"))
        .expect("light2X listed");
    assert!(selected.trim_start().starts_with('>'));
    assert!(text.contains("22.1"));
}

#[test]
fn keys_map_to_panel_actions() {
    assert_eq!(
        PanelKey::from_key(&Key::Named(NamedKey::Tab), false),
        Some(PanelKey::Next)
    );
    assert_eq!(
        PanelKey::from_key(&Key::Named(NamedKey::Tab), true),
        Some(PanelKey::Previous)
    );
    assert_eq!(
        PanelKey::from_key(&Key::Named(NamedKey::ArrowRight), false),
        Some(PanelKey::Increase)
    );
    assert_eq!(
        PanelKey::from_key(&Key::Named(NamedKey::PageDown), false),
        Some(PanelKey::DecreaseLarge)
    );
    assert_eq!(
        PanelKey::from_key(&Key::Named(NamedKey::Enter), false),
        Some(PanelKey::ToggleFolder)
    );
    assert_eq!(
        PanelKey::from_key(&Key::Character("H".into()), true),
        Some(PanelKey::ToggleVisible)
    );
    assert_eq!(PanelKey::from_key(&Key::Character("x".into()), false), None);
}
