use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use image::{ImageFormat, Rgb, RgbImage};

use super::correlation::CorrelationMatrix;
use super::filter::NumericSubset;
use crate::color::correlation_rgb;
use crate::error::PipelineError;

/// Default file name offered by the save dialog.
pub const EXPORT_FILE_NAME: &str = "correlation_data.csv";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Write the numeric subset as CSV, prefixed with a UTF-8 byte-order mark so
/// spreadsheet applications pick the right encoding.
///
/// Missing cells are written empty. Numbers use Rust's shortest round-trip
/// formatting, so re-reading the file yields identical values.
pub fn write_csv<W: Write>(subset: &NumericSubset, mut out: W) -> Result<(), PipelineError> {
    out.write_all(UTF8_BOM)?;

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(&subset.columns)?;
    for row in 0..subset.len() {
        writer.write_record(
            subset
                .row(row)
                .map(|v| v.map(|f| f.to_string()).unwrap_or_default()),
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Export the numeric subset to `path`.
pub fn export_file(subset: &NumericSubset, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(subset, std::io::BufWriter::new(file)).context("writing CSV export")?;
    log::info!(
        "Exported {} rows × {} columns to {}",
        subset.len(),
        subset.column_count(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Heatmap image
// ---------------------------------------------------------------------------

/// Pixel size of one matrix cell in the exported heatmap.
pub const HEATMAP_CELL_PX: u32 = 32;

const GRID_LINE: Rgb<u8> = Rgb([224, 224, 224]);
const BLANK_CELL: Rgb<u8> = Rgb([255, 255, 255]);

/// Rasterise a (possibly masked) matrix: one square per entry, coloured on
/// the correlation scale, masked entries left white.
pub fn heatmap_image(matrix: &CorrelationMatrix, cell_px: u32) -> RgbImage {
    let side = matrix.size() as u32 * cell_px;
    RgbImage::from_fn(side, side, |x, y| {
        if x % cell_px == 0 || y % cell_px == 0 {
            return GRID_LINE;
        }
        let (row, col) = ((y / cell_px) as usize, (x / cell_px) as usize);
        match matrix.get(row, col) {
            Some(r) => Rgb(correlation_rgb(r)),
            None => BLANK_CELL,
        }
    })
}

/// Save the heatmap of `matrix` as a PNG.
pub fn export_heatmap_png(matrix: &CorrelationMatrix, path: &Path) -> Result<()> {
    heatmap_image(matrix, HEATMAP_CELL_PX)
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("writing heatmap to {}", path.display()))?;
    log::info!("Exported {0}×{0} heatmap to {1}", matrix.size(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::correlation::{CorrelationMethod, correlation_matrix};
    use crate::data::filter::numeric_subset;
    use crate::data::loader::load_bytes;

    fn subset_of(csv: &[u8], columns: &[&str]) -> NumericSubset {
        let ds = load_bytes(csv).unwrap();
        let cols: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
        numeric_subset(&ds, &cols).unwrap()
    }

    #[test]
    fn starts_with_bom_and_header() {
        let subset = subset_of(b"id,x,y\na,1,2.5\nb,,\nc,3,\n", &["id", "x", "y"]);
        let mut buf = Vec::new();
        write_csv(&subset, &mut buf).unwrap();

        assert!(buf.starts_with(UTF8_BOM));
        let text = std::str::from_utf8(&buf[UTF8_BOM.len()..]).unwrap();
        assert_eq!(text, "x,y\n1,2.5\n3,\n");
    }

    #[test]
    fn round_trips_numeric_subset() {
        let subset = subset_of(
            b"name,a,b,c\nr1,0.1,-3,1e-7\nr2,,,\nr3,2.000001,,42\nr4,,7,\n",
            &["name", "a", "b", "c"],
        );
        let mut buf = Vec::new();
        write_csv(&subset, &mut buf).unwrap();

        let reread = subset_of(&buf, &["a", "b", "c"]);
        assert_eq!(reread.columns, subset.columns);
        assert_eq!(reread.values, subset.values);
        assert_eq!(reread.len(), subset.len());
    }

    #[test]
    fn export_file_writes_to_disk() {
        let subset = subset_of(b"x,y\n1,2\n3,4\n", &["x", "y"]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXPORT_FILE_NAME);
        export_file(&subset, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[3..], b"x,y\n1,2\n3,4\n");
    }

    #[test]
    fn heatmap_leaves_masked_cells_white() {
        let subset = subset_of(b"x,y,z\n1,2,1\n2,4,3\n3,6,2\n4,8,2.5\n", &["x", "y", "z"]);
        let masked = correlation_matrix(&subset, CorrelationMethod::Pearson).masked(0.9);
        let img = heatmap_image(&masked, 10);

        assert_eq!(img.dimensions(), (30, 30));
        // (x, y) is perfectly correlated, (x, z) falls under the threshold.
        assert_eq!(*img.get_pixel(15, 5), Rgb(correlation_rgb(1.0)));
        assert_eq!(*img.get_pixel(25, 5), BLANK_CELL);
        assert_eq!(*img.get_pixel(0, 0), GRID_LINE);
    }

    #[test]
    fn heatmap_png_is_written() {
        let subset = subset_of(b"x,y\n1,2\n3,1\n", &["x", "y"]);
        let matrix = correlation_matrix(&subset, CorrelationMethod::Pearson);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heatmap.png");
        export_heatmap_png(&matrix, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
    }
}
