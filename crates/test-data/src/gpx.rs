//! GPX file generation from course points.
//!
//! Output is GPX 1.1 and reads back through
//! [`forecast::course_track::read_course_track`].

use std::{fs, path::Path};

use crate::sources::CoursePoint;

/// Generates a GPX 1.1 document with a single track and segment.
pub fn generate_gpx(points: &[CoursePoint], course_name: &str) -> Vec<u8> {
    let mut gpx = String::new();

    gpx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    gpx.push('\n');
    gpx.push_str(r#"<gpx version="1.1" creator="ultra-forecast-test-data""#);
    gpx.push_str(r#" xmlns="http://www.topografix.com/GPX/1/1""#);
    gpx.push_str(r#" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#);
    gpx.push_str(r#" xsi:schemaLocation="http://www.topografix.com/GPX/1/1 http://www.topografix.com/GPX/1/1/gpx.xsd">"#);
    gpx.push('\n');

    let name = escape_xml(course_name);
    gpx.push_str(&format!("  <metadata>\n    <name>{name}</name>\n  </metadata>\n"));
    gpx.push_str(&format!("  <trk>\n    <name>{name}</name>\n    <trkseg>\n"));

    for point in points {
        gpx.push_str(&format!(
            r#"      <trkpt lat="{:.7}" lon="{:.7}">"#,
            point.lat, point.lon
        ));
        gpx.push('\n');
        if let Some(ele) = point.elevation {
            gpx.push_str(&format!("        <ele>{ele:.2}</ele>\n"));
        }
        gpx.push_str("      </trkpt>\n");
    }

    gpx.push_str("    </trkseg>\n  </trk>\n</gpx>\n");
    gpx.into_bytes()
}

pub fn write_gpx(
    path: impl AsRef<Path>,
    points: &[CoursePoint],
    course_name: &str,
) -> std::io::Result<()> {
    fs::write(path, generate_gpx(points, course_name))
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use forecast::course_track::{load_course_track, read_course_track};
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::sources::{CourseTrackGenerator, path_length_km};

    #[test]
    fn test_generate_gpx_basic() {
        let points = [
            CoursePoint {
                lat: 43.2100,
                lon: 5.5400,
                elevation: Some(120.0),
            },
            CoursePoint {
                lat: 43.2110,
                lon: 5.5410,
                elevation: Some(131.5),
            },
        ];

        let gpx = String::from_utf8(generate_gpx(&points, "Coastal Ridge")).unwrap();

        assert!(gpx.contains(r#"version="1.1""#));
        assert!(gpx.contains("<name>Coastal Ridge</name>"));
        assert!(gpx.contains(r#"lat="43.2100000""#));
        assert!(gpx.contains(r#"lon="5.5410000""#));
        assert!(gpx.contains("<ele>131.50</ele>"));
    }

    #[test]
    fn test_generate_gpx_escapes_special_chars() {
        let gpx = generate_gpx(&[], "Ridge & <Cove> \"100\"");
        let gpx = String::from_utf8(gpx).unwrap();
        assert!(gpx.contains("Ridge &amp; &lt;Cove&gt; &quot;100&quot;"));
    }

    #[test]
    fn test_point_without_elevation() {
        let points = [CoursePoint {
            lat: 43.0,
            lon: 5.0,
            elevation: None,
        }];
        let gpx = String::from_utf8(generate_gpx(&points, "Flat")).unwrap();
        assert!(!gpx.contains("<ele>"));
    }

    #[test]
    fn test_generated_course_reads_back() {
        let mut rng = StdRng::seed_from_u64(11);
        let points = CourseTrackGenerator::new(11)
            .with_distance_km(4.0)
            .generate(&mut rng)
            .unwrap();

        let track = read_course_track(generate_gpx(&points, "Loop").as_slice(), 1.0).unwrap();

        assert_eq!(track.raw_points, points.len());
        assert!((track.total_distance_km - path_length_km(&points)).abs() < 0.01);
        assert!(track.profile.len() >= 4);
    }

    #[test]
    fn test_write_gpx_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("course.gpx");
        let points = CourseTrackGenerator::new(3)
            .with_distance_km(1.5)
            .generate(&mut StdRng::seed_from_u64(3))
            .unwrap();

        write_gpx(&path, &points, "Short").unwrap();
        let track = load_course_track(&path, 0.5).unwrap();
        assert!(track.total_distance_km > 1.4);
    }
}
