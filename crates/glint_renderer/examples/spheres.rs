//! Renders the demo scene to `spheres.png`: a walled room with a
//! roughness/metallic sphere grid, three point lights and, when an OBJ
//! path is given on the command line, a mesh placed among them.
//!
//! ```sh
//! cargo run --release --example spheres [mesh.obj]
//! ```

use anyhow::Result;
use glint_math::Vec3;
use glint_renderer::{
    load_mesh, palette, BsdfMaterial, Color, DiskIo, FrameBuffer, FrameCounter, Plane, PointLight,
    Sphere, World,
};

fn main() -> Result<()> {
    env_logger::init();

    let mut world = World::new();
    world.set_checkerboard(false);

    let wall = BsdfMaterial {
        color: Color::rgb(0.2, 0.2, 0.2),
        ..Default::default()
    };
    let ceiling_light = BsdfMaterial {
        color: palette::WHITE,
        emissive: Color::rgb(1000.0, 1000.0, 1000.0),
        ..Default::default()
    };

    world.add(
        Plane { point: Vec3::new(0.0, 0.0, 10.0), normal: -Vec3::Z },
        wall.clone(),
    );
    world.add(
        Plane { point: Vec3::ZERO, normal: Vec3::Y },
        wall.clone(),
    );
    world.add(
        Plane { point: Vec3::new(0.0, 10.0, 0.0), normal: -Vec3::Y },
        ceiling_light.clone(),
    );
    world.add(
        Plane { point: Vec3::new(5.0, 0.0, 0.0), normal: -Vec3::X },
        wall.clone(),
    );
    world.add(
        Plane { point: Vec3::new(-5.0, 0.0, 0.0), normal: Vec3::X },
        wall,
    );

    // Metals along the bottom row, dielectrics above, smoothest on the
    // right.
    for (column, roughness) in [(-1.75, 1.0), (0.0, 0.6), (1.75, 0.1)] {
        world.add(
            Sphere { center: Vec3::new(column, 1.0, 0.0), radius: 0.75 },
            BsdfMaterial {
                color: palette::WHITE,
                roughness,
                metallic: 1.0,
                ..Default::default()
            },
        );
        world.add(
            Sphere { center: Vec3::new(column, 3.0, 0.0), radius: 0.75 },
            BsdfMaterial {
                color: palette::GRAY,
                roughness,
                ..Default::default()
            },
        );
    }

    world.add_light(PointLight {
        position: Vec3::new(0.0, 5.0, 5.0),
        color: Color::rgb(1.0, 0.6, 0.45),
    });
    world.add_light(PointLight {
        position: Vec3::new(-2.5, 5.0, -5.0),
        color: Color::rgb(1.0, 0.8, 0.45),
    });
    world.add_light(PointLight {
        position: Vec3::new(2.5, 2.5, -5.0),
        color: Color::rgb(0.35, 0.45, 0.65),
    });

    world.add(
        Sphere { center: Vec3::new(3.25, 1.0, -2.0), radius: 0.75 },
        ceiling_light,
    );
    world.add(
        Sphere { center: Vec3::new(-3.25, 1.0, -2.0), radius: 0.75 },
        BsdfMaterial {
            color: palette::RED,
            ..Default::default()
        },
    );

    if let Some(path) = std::env::args().nth(1) {
        let mut mesh = load_mesh(&mut DiskIo, &path)?;
        mesh.position = Vec3::new(0.0, 0.0, -4.0);
        mesh.scale = 10.0;
        world.add(
            mesh,
            BsdfMaterial {
                color: palette::WHITE,
                roughness: 0.6,
                metallic: 1.0,
                ..Default::default()
            },
        );
    }

    world.move_camera(Vec3::new(0.0, 3.0, -9.0));

    let (width, height) = (960, 540);
    let target = FrameBuffer::new(width, height);
    world.draw(&FrameCounter(0), &target);

    log::info!(
        "rendered {width}x{height}, bsdf mode {}, gi mode {}",
        world.bsdf_mode(),
        world.gi_mode()
    );

    image::RgbaImage::from_raw(width as u32, height as u32, target.to_rgba_bytes())
        .expect("frame buffer matches image dimensions")
        .save("spheres.png")?;

    Ok(())
}
