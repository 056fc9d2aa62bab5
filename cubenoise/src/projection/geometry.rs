//! Cube and sphere coordinate conventions.
//!
//! Face-local coordinates `(a, b)` lie in `[-0.5, 0.5]`, `a` growing to the
//! right of the face and `b` growing up. The cube has unit edge and is
//! centered at the origin: Front `+z`, Right `+x`, Back `-z`, Left `-x`,
//! Up `+y`, Down `-y`. Longitude is `atan2(x, z)`, latitude is the
//! elevation above the `xz` plane.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::cubemap::CubeFace;

/// Point on the cube surface for face-local `(a, b)`.
pub(super) fn face_point(face: CubeFace, a: f32, b: f32) -> Vec3 {
    match face {
        CubeFace::Front => Vec3::new(a, b, 0.5),
        CubeFace::Right => Vec3::new(0.5, b, -a),
        CubeFace::Back => Vec3::new(-a, b, -0.5),
        CubeFace::Left => Vec3::new(-0.5, b, a),
        CubeFace::Up => Vec3::new(a, 0.5, -b),
        CubeFace::Down => Vec3::new(a, -0.5, b),
    }
}

/// Face hit by the ray along `dir`, with face-local `(a, b)`. Inverse of [`face_point`].
pub(super) fn locate_on_cube(dir: Vec3) -> (CubeFace, f32, f32) {
    let abs = dir.abs();

    if abs.z >= abs.x && abs.z >= abs.y {
        let s = 0.5 / abs.z;
        if dir.z > 0.0 {
            (CubeFace::Front, dir.x * s, dir.y * s)
        } else {
            (CubeFace::Back, -dir.x * s, dir.y * s)
        }
    } else if abs.x >= abs.y {
        let s = 0.5 / abs.x;
        if dir.x > 0.0 {
            (CubeFace::Right, -dir.z * s, dir.y * s)
        } else {
            (CubeFace::Left, dir.z * s, dir.y * s)
        }
    } else {
        let s = 0.5 / abs.y;
        if dir.y > 0.0 {
            (CubeFace::Up, dir.x * s, -dir.z * s)
        } else {
            (CubeFace::Down, dir.x * s, dir.z * s)
        }
    }
}

pub(super) fn lon_lat(dir: Vec3) -> (f32, f32) {
    let lon = dir.x.atan2(dir.z);
    let lat = dir.y.atan2((dir.x * dir.x + dir.z * dir.z).sqrt());
    (lon, lat)
}

pub(super) fn direction(lon: f32, lat: f32) -> Vec3 {
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();
    Vec3::new(cos_lat * sin_lon, sin_lat, cos_lat * cos_lon)
}

/// Direction through the center of face pixel `(x, y)`.
pub(super) fn face_pixel_direction(face: CubeFace, x: u32, y: u32, size: u32) -> Vec3 {
    let n = size as f32;
    let a = (x as f32 + 0.5) / n - 0.5;
    let b = 0.5 - (y as f32 + 0.5) / n;
    face_point(face, a, b)
}

/// Continuous pixel coordinates on a `size` x `size` face for face-local `(a, b)`.
pub(super) fn face_sample_coords(a: f32, b: f32, size: u32) -> (f32, f32) {
    let n = size as f32;
    ((a + 0.5) * n - 0.5, (0.5 - b) * n - 0.5)
}

/// Direction through the center of equirectangular pixel `(x, y)`.
pub(super) fn erp_pixel_direction(x: u32, y: u32, width: u32, height: u32) -> Vec3 {
    let lon = ((x as f32 + 0.5) / width as f32 - 0.5) * TAU;
    let lat = (0.5 - (y as f32 + 0.5) / height as f32) * PI;
    direction(lon, lat)
}

/// Continuous equirectangular pixel coordinates of `dir`.
pub(super) fn erp_sample_coords(dir: Vec3, width: u32, height: u32) -> (f32, f32) {
    let (lon, lat) = lon_lat(dir);
    let x = (lon / TAU + 0.5) * width as f32 - 0.5;
    let y = (0.5 - lat / PI) * height as f32 - 0.5;
    (x, y)
}
