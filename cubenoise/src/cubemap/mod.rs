//! Cube faces, their fixed ordering, and the cross ("dice") layout.
//!
//! Every stage of the pipeline indexes faces through [`CubeFace`]; the
//! enumeration order is the storage order of [`CubeFaces`] and must never
//! change.

mod dice;


use std::ops::Index;

use strum_macros::{Display, EnumIter};

pub use dice::{assemble_dice, split_dice};

use crate::error::{Error, Result};
use crate::image::Image;

pub const FACE_COUNT: usize = 6;

/// One face of the cube, in pipeline order.
#[derive(Debug, Display, EnumIter, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CubeFace {
    Front,
    Right,
    Back,
    Left,
    Up,
    Down,
}

impl CubeFace {
    pub const ALL: [CubeFace; FACE_COUNT] = [
        CubeFace::Front,
        CubeFace::Right,
        CubeFace::Back,
        CubeFace::Left,
        CubeFace::Up,
        CubeFace::Down,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// `(row, col)` of this face in the 3x4 dice grid, in face-size units.
    ///
    /// ```text
    ///         [Up]
    /// [Left] [Front] [Right] [Back]
    ///        [Down]
    /// ```
    pub fn dice_block(self) -> (u32, u32) {
        match self {
            CubeFace::Up => (0, 1),
            CubeFace::Left => (1, 0),
            CubeFace::Front => (1, 1),
            CubeFace::Right => (1, 2),
            CubeFace::Back => (1, 3),
            CubeFace::Down => (2, 1),
        }
    }

    /// Artifact file name, e.g. `Front.png`.
    pub fn file_name(self) -> String {
        format!("{self}.png")
    }
}

/// Exactly six faces of identical shape, stored in [`CubeFace`] order.
#[derive(Clone, Debug, PartialEq)]
pub struct CubeFaces {
    faces: [Image; FACE_COUNT],
}

impl CubeFaces {
    /// Takes faces in `[Front, Right, Back, Left, Up, Down]` order.
    ///
    /// Fails with [`Error::ShapeMismatch`] unless there are six square faces
    /// sharing width, height and color format.
    pub fn new(faces: Vec<Image>) -> Result<CubeFaces> {
        check_uniform(&faces)?;

        let desc = faces[0].desc();
        if desc.width != desc.height {
            return Err(Error::ShapeMismatch(format!(
                "cube faces must be square, got {}",
                desc
            )));
        }

        let faces: [Image; FACE_COUNT] = faces
            .try_into()
            .map_err(|_| Error::ShapeMismatch("expected 6 cube faces".to_string()))?;

        Ok(CubeFaces { faces })
    }

    pub fn face(&self, face: CubeFace) -> &Image {
        &self.faces[face.index()]
    }

    /// Width (and height) of each face.
    pub fn face_size(&self) -> u32 {
        self.faces[0].width()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CubeFace, &Image)> {
        CubeFace::ALL.into_iter().zip(self.faces.iter())
    }

    pub fn as_slice(&self) -> &[Image] {
        &self.faces
    }

    pub fn to_dice(&self) -> Result<Image> {
        assemble_dice(&self.faces)
    }
}

impl Index<CubeFace> for CubeFaces {
    type Output = Image;

    fn index(&self, face: CubeFace) -> &Self::Output {
        self.face(face)
    }
}

/// Six faces sharing one descriptor.
pub(crate) fn check_uniform(faces: &[Image]) -> Result<()> {
    if faces.len() != FACE_COUNT {
        return Err(Error::ShapeMismatch(format!(
            "expected {} cube faces, got {}",
            FACE_COUNT,
            faces.len()
        )));
    }

    let desc = faces[0].desc();

    for (face, image) in CubeFace::ALL.iter().zip(faces) {
        if image.desc() != desc {
            return Err(Error::ShapeMismatch(format!(
                "{} face is {}, expected {}",
                face,
                image.desc(),
                desc
            )));
        }
    }

    Ok(())
}
