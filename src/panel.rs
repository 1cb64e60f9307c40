//! Keyboard driven debug panel.
//!
//! Two folders of sliders edit a [`GrainParams`]. Every accepted edit returns
//! the whole updated controller so the caller can re-apply all grain
//! uniforms and both light positions at once.

use std::fmt::Write as _;

use winit::keyboard::{Key, NamedKey};

use crate::config::GrainParams;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    Light1X,
    Light2X,
    NoiseCoef,
    NoiseMin,
    NoiseMax,
    NoiseScale,
}

impl Control {
    pub fn label(&self) -> &'static str {
        match self {
            Control::Light1X => "light1X",
            Control::Light2X => "light2X",
            Control::NoiseCoef => "uNoiseCoef",
            Control::NoiseMin => "uNoiseMin",
            Control::NoiseMax => "uNoiseMax",
            Control::NoiseScale => "uNoiseScale",
        }
    }

    pub fn get(&self, params: &GrainParams) -> f32 {
        match self {
            Control::Light1X => params.light1_x,
            Control::Light2X => params.light2_x,
            Control::NoiseCoef => params.noise_coef,
            Control::NoiseMin => params.noise_min,
            Control::NoiseMax => params.noise_max,
            Control::NoiseScale => params.noise_scale,
        }
    }

    fn set(&self, params: &mut GrainParams, value: f32) {
        let field = match self {
            Control::Light1X => &mut params.light1_x,
            Control::Light2X => &mut params.light2_x,
            Control::NoiseCoef => &mut params.noise_coef,
            Control::NoiseMin => &mut params.noise_min,
            Control::NoiseMax => &mut params.noise_max,
            Control::NoiseScale => &mut params.noise_scale,
        };
        *field = value;
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slider {
    pub control: Control,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl Slider {
    pub fn new(control: Control, min: f32, max: f32, step: f32) -> Self {
        Self {
            control,
            min,
            max,
            step,
        }
    }

    /// Clamps into `[min, max]`, then snaps to the nearest multiple of `step`.
    pub fn constrain(&self, value: f32) -> f32 {
        let clamped = value.clamp(self.min, self.max);
        if self.step > 0.0 {
            let snapped = (clamped / self.step).round() * self.step;
            // Trim float noise such as 0.30000001
            let scale = 10f32.powi(self.decimals() as i32);
            (snapped * scale).round() / scale
        } else {
            clamped
        }
    }

    /// Decimal places shown for values of this slider.
    pub fn decimals(&self) -> usize {
        let mut decimals = 0;
        let mut step = self.step;
        while decimals < 6 && step > 0.0 && (step - step.round()).abs() > 1e-6 {
            step *= 10.0;
            decimals += 1;
        }
        decimals
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Folder {
    pub name: String,
    pub open: bool,
    pub sliders: Vec<Slider>,
}

/// Panel actions bound to keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelKey {
    Next,
    Previous,
    Increase,
    Decrease,
    IncreaseLarge,
    DecreaseLarge,
    ToggleVisible,
    ToggleFolder,
}

impl PanelKey {
    /// Tab/Shift+Tab select, arrows and page keys adjust, H hides, Enter folds.
    pub fn from_key(key: &Key, shift: bool) -> Option<Self> {
        match key {
            Key::Named(NamedKey::Tab) if shift => Some(PanelKey::Previous),
            Key::Named(NamedKey::Tab) => Some(PanelKey::Next),
            Key::Named(NamedKey::ArrowRight) => Some(PanelKey::Increase),
            Key::Named(NamedKey::ArrowLeft) => Some(PanelKey::Decrease),
            Key::Named(NamedKey::PageUp) => Some(PanelKey::IncreaseLarge),
            Key::Named(NamedKey::PageDown) => Some(PanelKey::DecreaseLarge),
            Key::Named(NamedKey::Enter) => Some(PanelKey::ToggleFolder),
            Key::Character(c) if c.eq_ignore_ascii_case("h") => Some(PanelKey::ToggleVisible),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DebugPanel {
    params: GrainParams,
    pub folders: Vec<Folder>,
    selected: usize,
    pub visible: bool,
}

impl DebugPanel {
    pub const LARGE_STEP: f32 = 10.0;

    /// The lights and grain folders, both open, starting from `params` as given.
    pub fn new(params: GrainParams) -> Self {
        let folders = vec![
            Folder {
                name: "Lights position X".to_string(),
                open: true,
                sliders: vec![
                    Slider::new(Control::Light1X, -10.0, 10.0, 0.1),
                    Slider::new(Control::Light2X, -10.0, 10.0, 0.1),
                ],
            },
            Folder {
                name: "Grain".to_string(),
                open: true,
                sliders: vec![
                    Slider::new(Control::NoiseCoef, 0.0, 20.0, 0.1),
                    Slider::new(Control::NoiseMin, 0.0, 1.0, 0.1),
                    Slider::new(Control::NoiseMax, 0.0, 22.0, 0.1),
                    Slider::new(Control::NoiseScale, 0.0, 6.0, 0.1),
                ],
            },
        ];
        Self {
            params,
            folders,
            selected: 0,
            visible: true,
        }
    }

    pub fn params(&self) -> &GrainParams {
        &self.params
    }

    pub fn get(&self, control: Control) -> f32 {
        control.get(&self.params)
    }

    fn sliders(&self) -> impl Iterator<Item = (usize, &Slider)> {
        self.folders
            .iter()
            .enumerate()
            .flat_map(|(folder, f)| f.sliders.iter().map(move |slider| (folder, slider)))
    }

    fn slider_count(&self) -> usize {
        self.folders.iter().map(|f| f.sliders.len()).sum()
    }

    fn slider(&self, control: Control) -> Option<&Slider> {
        self.sliders()
            .map(|(_, slider)| slider)
            .find(|slider| slider.control == control)
    }

    pub fn selected(&self) -> Option<Control> {
        self.sliders()
            .nth(self.selected)
            .map(|(_, slider)| slider.control)
    }

    /// Sets `control` through its slider's constraints. Returns the updated
    /// controller when the value changed.
    pub fn set(&mut self, control: Control, value: f32) -> Option<GrainParams> {
        let slider = *self.slider(control)?;
        let value = slider.constrain(value);
        if value == control.get(&self.params) {
            return None;
        }
        control.set(&mut self.params, value);
        Some(self.params)
    }

    fn nudge(&mut self, steps: f32) -> Option<GrainParams> {
        let (folder, slider) = self
            .sliders()
            .nth(self.selected)
            .map(|(folder, slider)| (folder, *slider))?;
        if !self.folders[folder].open {
            return None;
        }
        let current = self.get(slider.control);
        self.set(slider.control, current + steps * slider.step)
    }

    fn select(&mut self, offset: isize) {
        let count = self.slider_count() as isize;
        if count > 0 {
            self.selected = (self.selected as isize + offset).rem_euclid(count) as usize;
        }
    }

    fn toggle_selected_folder(&mut self) {
        let folder = self.sliders().nth(self.selected).map(|(folder, _)| folder);
        if let Some(folder) = folder.and_then(|i| self.folders.get_mut(i)) {
            folder.open = !folder.open;
        }
    }

    /// Applies a key action. Returns the updated controller when a value changed.
    pub fn handle(&mut self, key: PanelKey) -> Option<GrainParams> {
        if !self.visible && key != PanelKey::ToggleVisible {
            return None;
        }
        match key {
            PanelKey::Next => self.select(1),
            PanelKey::Previous => self.select(-1),
            PanelKey::Increase => return self.nudge(1.0),
            PanelKey::Decrease => return self.nudge(-1.0),
            PanelKey::IncreaseLarge => return self.nudge(Self::LARGE_STEP),
            PanelKey::DecreaseLarge => return self.nudge(-Self::LARGE_STEP),
            PanelKey::ToggleVisible => self.visible = !self.visible,
            PanelKey::ToggleFolder => self.toggle_selected_folder(),
        }
        None
    }

    /// Text rendition: folder headers, and the sliders of open folders with
    /// the selected one marked.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        let mut index = 0;
        for folder in &self.folders {
            let marker = if folder.open { "v" } else { ">" };
            let _ = writeln!(text, "{marker} {}", folder.name);
            for slider in &folder.sliders {
                if folder.open {
                    let cursor = if index == self.selected { ">" } else { " " };
                    let _ = writeln!(
                        text,
                        "  {cursor} {:<12} {:>8.*}  [{}, {}]",
                        slider.control.label(),
                        slider.decimals(),
                        self.get(slider.control),
                        slider.min,
                        slider.max,
                    );
                }
                index += 1;
            }
        }
        text
    }
}
