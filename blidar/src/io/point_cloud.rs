//! This module has I/O functionality for points clouds

use crate::PointCloudFeatures;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Write a point cloud as a comma separated table with an `X,Y,Z` header row and one row per
/// point, in the cloud's order. Any existing file at `path` is overwritten. Values are written
/// in the shortest decimal form which reads back to the same `f64`, always with a decimal point
/// or exponent so that they parse as floats.
///
/// # Arguments
///
/// * `path`: the file to write
/// * `cloud`: the points to write
///
/// returns: Result<(), Error>
pub fn write_csv(path: &Path, cloud: &impl PointCloudFeatures) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);

    writeln!(writer, "X,Y,Z")?;
    for p in cloud.points() {
        writeln!(writer, "{:?},{:?},{:?}", p.x, p.y, p.z)?;
    }

    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Point3, PointCloud};

    #[test]
    fn header_and_rows() {
        let cloud = PointCloud::from(vec![
            Point3::new(0.0, 5.0, 0.0),
            Point3::new(-1.25, 0.1, 1e-7),
        ]);
        let path = std::env::temp_dir().join("blidar_io_header_and_rows.csv");
        write_csv(&path, &cloud).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(text, "X,Y,Z\n0.0,5.0,0.0\n-1.25,0.1,1e-7\n");
    }

    #[test]
    fn overwrites_existing_file() {
        let path = std::env::temp_dir().join("blidar_io_overwrites_existing_file.csv");
        let long = PointCloud::from(vec![Point3::origin(); 10]);
        let short = PointCloud::from(vec![Point3::new(1.0, 2.0, 3.0)]);
        write_csv(&path, &long).unwrap();
        write_csv(&path, &short).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert_eq!(text.lines().nth(1), Some("1.0,2.0,3.0"));
    }
}
