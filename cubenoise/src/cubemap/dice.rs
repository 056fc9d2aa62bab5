use super::{check_uniform, CubeFace, CubeFaces};
use crate::error::{Error, Result};
use crate::image::{Image, ImageDesc};

/// Dice grid size in face units: 4 columns, 3 rows.
const DICE_COLS: u32 = 4;
const DICE_ROWS: u32 = 3;

/// Places six faces (in [`CubeFace`] order) on a zero-filled `3H x 4W` cross.
///
/// Cells outside the cross stay zero. Fails with [`Error::ShapeMismatch`]
/// unless there are exactly six faces with identical descriptors.
pub fn assemble_dice(faces: &[Image]) -> Result<Image> {
    check_uniform(faces)?;

    let face_desc = faces[0].desc();
    let (w, h) = (face_desc.width, face_desc.height);

    let mut dice = Image::new_black(ImageDesc::new(
        w * DICE_COLS,
        h * DICE_ROWS,
        face_desc.color_format,
    ));

    for (face, image) in CubeFace::ALL.into_iter().zip(faces) {
        let (row, col) = face.dice_block();
        dice.copy_from(image, col * w, row * h)?;
    }

    Ok(dice)
}

/// Inverse of [`assemble_dice`]: cuts the six face blocks out of a dice image.
///
/// The dice must be `3N x 4N` for some `N > 0`.
pub fn split_dice(dice: &Image) -> Result<CubeFaces> {
    let desc = dice.desc();
    let face_size = desc.width / DICE_COLS;

    if face_size == 0
        || desc.width != face_size * DICE_COLS
        || desc.height != face_size * DICE_ROWS
    {
        return Err(Error::ShapeMismatch(format!(
            "dice image must be 3N x 4N, got {}",
            desc
        )));
    }

    let faces = CubeFace::ALL
        .into_iter()
        .map(|face| {
            let (row, col) = face.dice_block();
            dice.crop(col * face_size, row * face_size, face_size, face_size)
        })
        .collect::<Result<Vec<_>>>()?;

    CubeFaces::new(faces)
}
