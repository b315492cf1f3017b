use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::{bail, Context, Result};
use image::{codecs::png::PngEncoder, ImageEncoder};
use libgbitmap::{Bitmap, Magic};
use tracing::{debug, info, instrument};

/// Reads the header and payload of `file` and returns a one-line summary
#[instrument]
pub fn describe(file: &Path, border: u16) -> Result<String> {
    let reader = BufReader::new(File::open(file)?);
    let bitmap = Bitmap::new();
    let header = bitmap
        .read_from(reader, border)
        .with_context(|| format!("decode {}", file.display()))?;
    debug!("Read {header:?}");
    let mut summary = format!(
        "{}: {} {}x{}, {} gray levels",
        file.display(),
        header.magic,
        header.cols,
        header.rows,
        bitmap.grays()
    );
    if let Some(maxval) = header.maxval {
        summary.push_str(&format!(" (maxval {maxval})"));
    }
    Ok(summary)
}

/// Re-encodes the bitmap in `input` as `to` into `output`
#[instrument]
pub fn convert(input: &Path, output: &Path, to: Magic, border: u16) -> Result<()> {
    if input == output {
        bail!("Refusing to overwrite {}", input.display());
    }
    let bitmap =
        Bitmap::from_file(input, border).with_context(|| format!("decode {}", input.display()))?;
    debug!(
        "Read {}x{} bitmap with {} gray levels",
        bitmap.cols(),
        bitmap.rows(),
        bitmap.grays()
    );

    let file = File::options()
        .create(true)
        .write(true)
        .truncate(true)
        .open(output)?;
    let mut w = BufWriter::new(file);
    bitmap
        .save(&mut w, to)
        .with_context(|| format!("encode {} as {to}", input.display()))?;
    w.flush()?;
    info!("Successfully wrote {to} bitmap to {}", output.display());
    Ok(())
}

/// Luminance of every pixel, top row first, white being 255
#[must_use]
pub fn luma_rows(bitmap: &Bitmap) -> Vec<u8> {
    let raster = bitmap.read();
    let black = u32::from(raster.grays() - 1);
    raster
        .rows_from_top()
        .flatten()
        .map(|p| {
            let level = u32::from(*p).min(black);
            u8::try_from(255 - level * 255 / black).unwrap_or(0)
        })
        .collect()
}

/// Writes the bitmap in `input` as an 8-bit grayscale PNG
#[instrument]
pub fn bitmap_to_png(input: &Path, output: &Path, border: u16) -> Result<()> {
    let bitmap =
        Bitmap::from_file(input, border).with_context(|| format!("decode {}", input.display()))?;
    let luma = luma_rows(&bitmap);
    debug!("Length of luma data: {}", luma.len());

    let output_file = File::options()
        .create(true)
        .write(true)
        .truncate(true)
        .open(output)?;

    info!("Writing grayscale image to {}", output.display());
    let encoder = PngEncoder::new(output_file);
    encoder.write_image(
        &luma,
        u32::from(bitmap.cols()),
        u32::from(bitmap.rows()),
        image::ExtendedColorType::L8,
    )?;
    info!("Successfully wrote grayscale image to {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luma_is_inverted_and_top_first() -> Result<()> {
        let bitmap = Bitmap::from_reader(&b"P2\n2 2\n3\n0 1\n2 3"[..], 0)?;
        assert_eq!(luma_rows(&bitmap), vec![0, 85, 170, 255]);
        Ok(())
    }
}
