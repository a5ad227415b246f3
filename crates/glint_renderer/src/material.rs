//! The material set: solid color, Lambert diffuse and a Cook-Torrance
//! microfacet BSDF with optional reflection and single-bounce GI.

use std::f32::consts::{PI, TAU};
use std::fmt;

use glint_core::Hit;
use glint_math::Vec3;

use crate::color::Color;
use crate::world::World;

/// Offset applied to secondary-ray origins to escape the surface.
const RAY_BIAS: f32 = 1e-3;

/// Bounce depth at which the reflection pass stops recursing.
const MAX_REFLECTION_DEPTH: u32 = 4;

/// Stratified hemisphere resolution of the GI estimator.
const GI_RINGS: usize = 32;
const GI_SECTORS: usize = 32;

/// Debug decomposition of the BSDF direct term. `Default` sums the weighted
/// diffuse and specular contributions; every other mode emits the named
/// term alone.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum BsdfMode {
    #[default]
    Default,
    Diffuse,
    CookTorrance,
    Fresnel,
    NormalDistribution,
    Microfacets,
}

impl BsdfMode {
    /// The next mode in declaration order, wrapping at the end.
    pub fn next(self) -> Self {
        match self {
            BsdfMode::Default => BsdfMode::Diffuse,
            BsdfMode::Diffuse => BsdfMode::CookTorrance,
            BsdfMode::CookTorrance => BsdfMode::Fresnel,
            BsdfMode::Fresnel => BsdfMode::NormalDistribution,
            BsdfMode::NormalDistribution => BsdfMode::Microfacets,
            BsdfMode::Microfacets => BsdfMode::Default,
        }
    }
}

impl fmt::Display for BsdfMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BsdfMode::Default => "Default",
            BsdfMode::Diffuse => "Diffuse",
            BsdfMode::CookTorrance => "CookTorrance",
            BsdfMode::Fresnel => "Fresnel",
            BsdfMode::NormalDistribution => "NormalDistribution",
            BsdfMode::Microfacets => "Microfacets",
        };
        f.write_str(name)
    }
}

/// Global illumination estimator selector.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum GiMode {
    #[default]
    None,
    Simple,
}

impl GiMode {
    pub fn next(self) -> Self {
        match self {
            GiMode::None => GiMode::Simple,
            GiMode::Simple => GiMode::None,
        }
    }
}

impl fmt::Display for GiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GiMode::None => "None",
            GiMode::Simple => "Simple",
        })
    }
}

/// A flat, unlit color.
#[derive(Debug, Clone, PartialEq)]
pub struct SolidMaterial {
    pub color: Color,
}

/// Lambert diffuse lit by the world's point lights. No ambient term, no
/// distance attenuation.
#[derive(Debug, Clone, PartialEq)]
pub struct LambertMaterial {
    pub color: Color,
    pub diffuse_reflectance: f32,
}

/// Cook-Torrance microfacet parameters: GGX normal distribution, Schlick
/// Fresnel and Smith-Schlick geometry term.
#[derive(Debug, Clone, PartialEq)]
pub struct BsdfMaterial {
    pub color: Color,
    pub emissive: Color,
    pub roughness: f32,
    pub metallic: f32,
}

impl Default for BsdfMaterial {
    fn default() -> Self {
        Self {
            color: Color::default(),
            emissive: Color::default(),
            roughness: 1.0,
            metallic: 0.0,
        }
    }
}

/// The closed material set. Equality is structural and exact, which is what
/// the world's add-time deduplication relies on.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    Solid(SolidMaterial),
    Lambert(LambertMaterial),
    Bsdf(BsdfMaterial),
}

impl Material {
    pub fn solid(color: Color) -> Self {
        Material::Solid(SolidMaterial { color })
    }

    pub fn lambert(color: Color, diffuse_reflectance: f32) -> Self {
        Material::Lambert(LambertMaterial {
            color,
            diffuse_reflectance,
        })
    }

    /// Evaluate the material at a hit. `depth` is the bounce depth, zero
    /// for primary rays.
    pub fn shade(&self, hit: &Hit, world: &World, depth: u32) -> Color {
        match self {
            Material::Solid(solid) => solid.color,
            Material::Lambert(lambert) => lambert.shade(hit, world),
            Material::Bsdf(bsdf) => bsdf.shade(hit, world, depth),
        }
    }
}

impl From<SolidMaterial> for Material {
    fn from(solid: SolidMaterial) -> Self {
        Material::Solid(solid)
    }
}

impl From<LambertMaterial> for Material {
    fn from(lambert: LambertMaterial) -> Self {
        Material::Lambert(lambert)
    }
}

impl From<BsdfMaterial> for Material {
    fn from(bsdf: BsdfMaterial) -> Self {
        Material::Bsdf(bsdf)
    }
}

impl LambertMaterial {
    fn shade(&self, hit: &Hit, world: &World) -> Color {
        let color = Vec3::from(self.color);
        let mut out = Vec3::ZERO;

        for light in world.lights() {
            let to_light = light.position - hit.origin;
            let light_direction = to_light.normalize();
            let distance_to_light = to_light.length();

            if world.shadows() && occluded(world, hit, light_direction, distance_to_light) {
                continue;
            }

            let lambert_diffuse =
                Vec3::from(light.color) * color * hit.normal.dot(light_direction).max(0.0);

            out += lambert_diffuse * self.diffuse_reflectance;
        }

        out.into()
    }
}

impl BsdfMaterial {
    fn shade(&self, hit: &Hit, world: &World, depth: u32) -> Color {
        let base_color = Vec3::from(self.color);
        // Roughness is squared once up front; every use below sees alpha.
        let alpha = self.roughness * self.roughness;

        let mut out = Vec3::ZERO;

        let base_reflectivity = Vec3::splat(0.04).lerp(base_color, self.metallic);
        let view_direction = (world.camera_position() - hit.origin).normalize();

        // Specular and diffuse pass.
        for light in world.lights() {
            let to_light = light.position - hit.origin;
            let light_direction = to_light.normalize();
            let distance_to_light = to_light.length();
            let half = (view_direction + light_direction).normalize();

            if world.shadows() && occluded(world, hit, light_direction, distance_to_light) {
                continue;
            }

            let ndoth = hit.normal.dot(half);
            let normal_distribution =
                sq(alpha) / (PI * sq(sq(ndoth) * (sq(alpha) - 1.0) + 1.0));

            let fresnel = base_reflectivity
                + (Vec3::ONE - base_reflectivity)
                    * (1.0 - half.dot(view_direction).clamp(0.0, 1.0)).powi(5);

            let direct_k = sq(alpha + 1.0) / 8.0;
            let ndotv = hit.normal.dot(view_direction).clamp(0.0, 1.0);
            let ndotl = hit.normal.dot(light_direction).clamp(0.0, 1.0);
            let microfacets = (ndotv / (ndotv * (1.0 - direct_k) + direct_k).max(1e-3))
                * (ndotl / (ndotl * (1.0 - direct_k) + direct_k).max(1e-3));

            let cook_torrance = fresnel * normal_distribution * microfacets
                / (4.0 * view_direction.dot(hit.normal) * light_direction.dot(hit.normal));

            let light_color = Vec3::from(light.color);
            let lambert_diffuse =
                light_color * base_color * hit.normal.dot(light_direction).max(0.0);
            let diffuse_reflectance = (Vec3::ONE - fresnel) * (1.0 - self.metallic);

            out += match world.bsdf_mode() {
                BsdfMode::Default => {
                    diffuse_reflectance * lambert_diffuse + cook_torrance * light_color * ndotl
                }
                BsdfMode::Diffuse => lambert_diffuse,
                BsdfMode::CookTorrance => cook_torrance,
                BsdfMode::Fresnel => fresnel,
                BsdfMode::NormalDistribution => Vec3::splat(normal_distribution),
                BsdfMode::Microfacets => Vec3::splat(microfacets),
            };
        }

        // Reflection pass.
        if depth < MAX_REFLECTION_DEPTH && self.metallic > 0.0 && 1.0 - alpha > 1e-3 {
            let reflect_direction = (-view_direction
                + hit.normal * (2.0 * view_direction.dot(hit.normal)))
            .normalize();
            let reflect_origin = hit.origin + hit.normal * RAY_BIAS;

            let environment = match world.cast_ray(reflect_origin, reflect_direction) {
                Some(next_hit) => Vec3::from(
                    world
                        .material(next_hit.material_index)
                        .shade(&next_hit, world, depth + 1),
                ),
                None => Vec3::from(world.background_color()),
            };

            let grazing = (1.0 - hit.normal.dot(view_direction).clamp(0.0, 1.0)).powi(5);
            let specular = environment
                * (base_reflectivity + (Vec3::ONE - base_reflectivity) * grazing)
                * Vec3::ONE.lerp(base_color, self.metallic);

            out += specular * (self.metallic * (1.0 - alpha));
        }

        // Single-bounce hemisphere estimate.
        if world.gi_mode() == GiMode::Simple && depth < 1 {
            out += self.gather_indirect(hit, world, alpha, depth);
        }

        out += Vec3::from(self.emissive);

        out.into()
    }

    /// Cosine-weighted hemisphere gather over a fixed stratified sample
    /// set. The set is deterministic, so repeated shades of the same hit
    /// produce identical colors.
    fn gather_indirect(&self, hit: &Hit, world: &World, alpha: f32, depth: u32) -> Vec3 {
        let base_color = Vec3::from(self.color);
        let background = Vec3::from(world.background_color());
        let (tangent, bitangent) = tangent_basis(hit.normal);
        let bounce_origin = hit.origin + hit.normal * RAY_BIAS;

        let mut sum = Vec3::ZERO;

        for ring in 0..GI_RINGS {
            // Disk radius grows with roughness, so rougher surfaces gather
            // from a wider cone.
            let stratum = (ring as f32 + 0.5) / GI_RINGS as f32;
            let radius = stratum.sqrt() * alpha;
            let elevation = (1.0 - radius * radius).sqrt();

            for sector in 0..GI_SECTORS {
                let azimuth = TAU * (sector as f32 + 0.5) / GI_SECTORS as f32;
                let direction = tangent * (radius * azimuth.cos())
                    + bitangent * (radius * azimuth.sin())
                    + hit.normal * elevation;

                sum += match world.cast_ray(bounce_origin, direction) {
                    Some(bounce_hit) => {
                        let bounce = Vec3::from(
                            world
                                .material(bounce_hit.material_index)
                                .shade(&bounce_hit, world, depth + 1),
                        );
                        (base_color * bounce * direction.dot(hit.normal).max(0.0)).min(Vec3::ONE)
                    }
                    None => base_color * background,
                };
            }
        }

        sum / (GI_RINGS * GI_SECTORS) as f32
    }
}

/// Shadow test shared by the Lambert and BSDF direct passes.
fn occluded(world: &World, hit: &Hit, light_direction: Vec3, distance_to_light: f32) -> bool {
    let shadow_origin = hit.origin + hit.normal * RAY_BIAS;
    match world.cast_ray(shadow_origin, light_direction) {
        Some(shadow_hit) => shadow_hit.distance < distance_to_light,
        None => false,
    }
}

fn sq(value: f32) -> f32 {
    value * value
}

/// Branchless orthonormal basis around a unit normal.
fn tangent_basis(n: Vec3) -> (Vec3, Vec3) {
    let sign = if n.z >= 0.0 { 1.0 } else { -1.0 };
    let a = -1.0 / (sign + n.z);
    let b = n.x * n.y * a;

    let tangent = Vec3::new(1.0 + sign * n.x * n.x * a, sign * b, -sign * n.x);
    let bitangent = Vec3::new(b, sign + n.y * n.y * a, -n.y);

    (tangent, bitangent)
}
