mod common;

use cgmath::{InnerSpace, Point3, Rad, Vector3};
use common::fixtures::{assert_close, assert_vec_close};
use riso_scene::{
    config::{GrainParams, LightConfig},
    pipelines::{
        grain::GrainUniform,
        light::{LightsUniform, SpotLight, SpotLightRaw, mk_uniform},
    },
};

#[test]
fn spot_lights_aim_at_the_origin() {
    let light = SpotLight::from_config(&LightConfig::default());
    assert_eq!(light.position, Vector3::new(10.0, 10.0, 10.0));
    assert_eq!(light.target, Point3::new(0.0, 0.0, 0.0));
    assert_close(light.intensity, 1.1);
    assert_vec_close(light.direction(), -Vector3::new(1.0, 1.0, 1.0).normalize());
}

#[test]
fn light_on_its_target_points_down() {
    let light = SpotLight {
        position: Vector3::new(0.0, 0.0, 0.0),
        ..SpotLight::from_config(&LightConfig::default())
    };
    assert_vec_close(light.direction(), -Vector3::unit_y());
}

#[test]
fn penumbra_is_clamped_to_a_fraction() {
    let light = SpotLight::from_config(&LightConfig {
        penumbra: 3.0,
        angle: cgmath::Deg(30.0),
        ..LightConfig::default()
    });
    assert_eq!(light.penumbra, 1.0);
    assert_close(light.angle.0, Rad::from(cgmath::Deg(30.0_f32)).0);
}

#[test]
fn uniforms_have_gpu_friendly_sizes() {
    assert_eq!(std::mem::size_of::<SpotLightRaw>(), 48);
    assert_eq!(std::mem::size_of::<LightsUniform>(), 2 * 48 + 16);
    assert_eq!(std::mem::size_of::<GrainUniform>(), 32);
}

#[test]
fn lights_uniform_counts_active_lights() {
    let one = mk_uniform(&[SpotLight::from_config(&LightConfig::default())]);
    let bytes: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&one));
    // ambient.w follows both light slots
    assert_eq!(bytes[27], 1.0);
    assert_eq!(bytes[24], 0.1);

    let none = mk_uniform(&[]);
    let bytes: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&none));
    assert_eq!(bytes[27], 0.0);
    assert!(bytes[..24].iter().all(|v| *v == 0.0));
}

#[test]
fn grain_uniform_mirrors_the_panel_values() {
    let params = GrainParams {
        noise_coef: 4.0,
        noise_scale: 1.5,
        ..GrainParams::default()
    };
    let uniform = GrainUniform::new(&params);
    assert_eq!(uniform.noise(), [4.0, 0.5, 22.09, 1.5]);
}

#[test]
fn setting_an_unknown_light_is_ignored() {
    use riso_scene::pipelines::light::set_light_x;

    let mut lights = vec![SpotLight::from_config(&LightConfig::default())];
    set_light_x(&mut lights, 0, -7.0);
    set_light_x(&mut lights, 3, 1.0);
    assert_eq!(lights[0].position, Vector3::new(-7.0, 10.0, 10.0));
    assert_eq!(lights.len(), 1);
}
