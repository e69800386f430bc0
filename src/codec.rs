//! Coordinate codec: the one place where axis order changes.
//!
//! Clients speak `[latitude, longitude]`. The store speaks WKT and native
//! points with X = longitude, Y = latitude, and the GeoJSON exchange format
//! uses `[longitude, latitude]` arrays. Every conversion between those
//! conventions goes through this module.
//!
//! ```rust
//! use tourgeo::codec::{encode_line, parse_line, decode_point};
//! use tourgeo::GeoPoint;
//!
//! let path = [GeoPoint::new(-33.0, -70.0), GeoPoint::new(-33.5, -70.5)];
//! let wkt = encode_line(&path)?;
//! assert_eq!(wkt, "LINESTRING(-70 -33, -70.5 -33.5)");
//!
//! let back: Vec<GeoPoint> = parse_line(&wkt)?.iter().map(decode_point).collect();
//! assert_eq!(back, path);
//! # Ok::<(), tourgeo::TourGeoError>(())
//! ```

use crate::error::{Result, TourGeoError};
use crate::store::{NativePoint, SiteRow, StorePoint};
use geo::{LineString, Polygon};
use geojson::{Geometry, Value};
use std::fmt::Write;
use tourgeo_types::{GeoPoint, Site};
use wkt::TryFromWkt;

/// Converts client `[latitude, longitude]` pairs into points.
///
/// A pair with any other number of values is rejected; nothing is guessed.
pub fn from_lat_lon_pairs(pairs: &[Vec<f64>]) -> Result<Vec<GeoPoint>> {
    pairs
        .iter()
        .enumerate()
        .map(|(idx, pair)| match pair.as_slice() {
            [lat, lon] => Ok(GeoPoint::new(*lat, *lon)),
            other => Err(TourGeoError::InvalidGeometry(format!(
                "coordinate pair at index {} has {} values, expected [latitude, longitude]",
                idx,
                other.len()
            ))),
        })
        .collect()
}

/// Swaps a client point into store axis order.
#[inline]
pub fn encode_point(point: &GeoPoint) -> StorePoint {
    StorePoint::new(point.longitude, point.latitude)
}

/// Reads a store-native point back into the client convention.
#[inline]
pub fn decode_point<P: NativePoint + ?Sized>(native: &P) -> GeoPoint {
    GeoPoint::new(native.y(), native.x())
}

/// Rebuilds a site record from its store row.
pub fn decode_site(row: SiteRow) -> Site {
    Site {
        id: row.id,
        location: decode_point(&row.location),
        name: row.name,
        description: row.description,
        category: row.category,
        average_rating: row.average_rating,
        review_count: row.review_count,
    }
}

/// Encodes a path as `LINESTRING(lon lat, lon lat, ...)` in input order.
pub fn encode_line(points: &[GeoPoint]) -> Result<String> {
    if points.len() < 2 {
        return Err(TourGeoError::InvalidGeometry(format!(
            "a linestring needs at least 2 points, got {}",
            points.len()
        )));
    }

    let mut wkt = String::from("LINESTRING(");
    write_coords(&mut wkt, points.iter())?;
    wkt.push(')');
    Ok(wkt)
}

/// Encodes a zone as `POLYGON((lon lat, ...))`.
///
/// The ring is closed by repeating the first vertex unless the caller
/// already did so; stores reject open rings.
pub fn encode_polygon(points: &[GeoPoint]) -> Result<String> {
    if points.len() < 3 {
        return Err(TourGeoError::InvalidGeometry(format!(
            "a polygon needs at least 3 points, got {}",
            points.len()
        )));
    }

    let closed = points.first() == points.last();
    if closed && points.len() < 4 {
        return Err(TourGeoError::InvalidGeometry(
            "a closed polygon ring needs at least 3 distinct vertices".to_string(),
        ));
    }

    let mut wkt = String::from("POLYGON((");
    if closed {
        write_coords(&mut wkt, points.iter())?;
    } else {
        write_coords(&mut wkt, points.iter().chain(points.first()))?;
    }
    wkt.push_str("))");
    Ok(wkt)
}

fn write_coords<'a>(out: &mut String, points: impl Iterator<Item = &'a GeoPoint>) -> Result<()> {
    for (idx, point) in points.enumerate() {
        if !point.latitude.is_finite() || !point.longitude.is_finite() {
            return Err(TourGeoError::InvalidGeometry(format!(
                "point at index {} has a non-finite coordinate",
                idx
            )));
        }
        if idx > 0 {
            out.push_str(", ");
        }
        let native = encode_point(point);
        // Writing into a String cannot fail.
        let _ = write!(out, "{} {}", native.x, native.y);
    }
    Ok(())
}

/// Parses `LINESTRING(x y, ...)` into store-native points.
pub fn parse_line(text: &str) -> Result<Vec<StorePoint>> {
    let line = LineString::<f64>::try_from_wkt_str(text)
        .map_err(|e| TourGeoError::InvalidGeometry(format!("invalid linestring: {}", e)))?;
    if line.0.len() < 2 {
        return Err(TourGeoError::InvalidGeometry(format!(
            "a linestring needs at least 2 points, got {}",
            line.0.len()
        )));
    }
    Ok(line.coords().map(|c| StorePoint::new(c.x, c.y)).collect())
}

/// Parses a single-ring `POLYGON((x y, ...))` into its closed exterior ring.
///
/// An open ring is closed on parse. The ring needs at least 3 distinct
/// vertices, and polygons with holes are rejected.
pub fn parse_polygon(text: &str) -> Result<Vec<StorePoint>> {
    let polygon = Polygon::<f64>::try_from_wkt_str(text)
        .map_err(|e| TourGeoError::InvalidGeometry(format!("invalid polygon: {}", e)))?;
    if !polygon.interiors().is_empty() {
        return Err(TourGeoError::InvalidGeometry(
            "polygons with interior rings are not supported".to_string(),
        ));
    }

    let ring = polygon.exterior();
    if ring.0.len() < 4 {
        return Err(TourGeoError::InvalidGeometry(format!(
            "a polygon ring needs at least 4 coordinates, got {}",
            ring.0.len()
        )));
    }
    Ok(ring.coords().map(|c| StorePoint::new(c.x, c.y)).collect())
}

/// Decodes a GeoJSON LineString (`[longitude, latitude]` arrays) into a
/// client-ordered path.
pub fn decode_exchange_line(geometry: &Geometry) -> Result<Vec<GeoPoint>> {
    match &geometry.value {
        Value::LineString(coords) => coords
            .iter()
            .map(|position| match position.as_slice() {
                [x, y, ..] => Ok(decode_point(&StorePoint::new(*x, *y))),
                _ => Err(TourGeoError::InvalidGeometry(
                    "position must have at least 2 values".to_string(),
                )),
            })
            .collect(),
        _ => Err(TourGeoError::InvalidGeometry(
            "exchange geometry is not a LineString".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn santiago_path() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(-33.4372, -70.6506),
            GeoPoint::new(-33.4405, -70.6413),
            GeoPoint::new(-33.4489, -70.6693),
        ]
    }

    #[test]
    fn test_encode_line_swaps_axes() {
        let wkt = encode_line(&santiago_path()).unwrap();
        assert_eq!(
            wkt,
            "LINESTRING(-70.6506 -33.4372, -70.6413 -33.4405, -70.6693 -33.4489)"
        );
    }

    #[test]
    fn test_encode_line_requires_two_points() {
        let err = encode_line(&[GeoPoint::new(1.0, 2.0)]).unwrap_err();
        assert!(matches!(err, TourGeoError::InvalidGeometry(_)));
        assert!(encode_line(&[]).is_err());
    }

    #[test]
    fn test_encode_line_rejects_non_finite() {
        let points = [GeoPoint::new(1.0, 2.0), GeoPoint::new(f64::NAN, 2.0)];
        assert!(matches!(
            encode_line(&points),
            Err(TourGeoError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_line_roundtrip_recovers_lat_lon() {
        let path = santiago_path();
        let wkt = encode_line(&path).unwrap();
        let decoded: Vec<GeoPoint> = parse_line(&wkt).unwrap().iter().map(decode_point).collect();

        assert_eq!(decoded.len(), path.len());
        for (original, back) in path.iter().zip(&decoded) {
            assert!(original.approx_eq(back, 1e-12));
        }
    }

    #[test]
    fn test_encode_polygon_closes_ring() {
        let square = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(1.0, 0.0),
        ];
        let wkt = encode_polygon(&square).unwrap();
        assert_eq!(wkt, "POLYGON((0 0, 1 0, 1 1, 0 1, 0 0))");
    }

    #[test]
    fn test_encode_polygon_keeps_closed_ring() {
        let triangle = [
            GeoPoint::new(10.0, 20.0),
            GeoPoint::new(11.0, 20.0),
            GeoPoint::new(10.0, 21.0),
            GeoPoint::new(10.0, 20.0),
        ];
        let wkt = encode_polygon(&triangle).unwrap();
        assert_eq!(wkt, "POLYGON((20 10, 20 11, 21 10, 20 10))");
    }

    #[test]
    fn test_encode_polygon_minimums() {
        let two = [GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0)];
        assert!(encode_polygon(&two).is_err());

        let degenerate = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(0.0, 0.0),
        ];
        assert!(encode_polygon(&degenerate).is_err());
    }

    #[test]
    fn test_polygon_roundtrip() {
        let zone = santiago_path();
        let wkt = encode_polygon(&zone).unwrap();
        let ring: Vec<GeoPoint> = parse_polygon(&wkt)
            .unwrap()
            .iter()
            .map(decode_point)
            .collect();

        assert_eq!(ring.len(), zone.len() + 1);
        assert_eq!(ring.first(), ring.last());
        for (original, back) in zone.iter().zip(&ring) {
            assert!(original.approx_eq(back, 1e-12));
        }
    }

    #[test]
    fn test_point_roundtrip() {
        let p = GeoPoint::new(-33.4372, -70.6506);
        let native = encode_point(&p);
        assert_eq!(native.x, -70.6506);
        assert_eq!(native.y, -33.4372);
        assert_eq!(decode_point(&native), p);
    }

    #[test]
    fn test_parse_accepts_loose_formatting() {
        let points = parse_line("LINESTRING ( 1 2 ,3   4 ) ").unwrap();
        assert_eq!(points, vec![StorePoint::new(1.0, 2.0), StorePoint::new(3.0, 4.0)]);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_line("POINT(1 2)").is_err());
        assert!(parse_line("LINESTRING(1 2, 3)").is_err());
        assert!(parse_line("LINESTRING(1 2, a 4)").is_err());
        assert!(parse_line("LINESTRING 1 2, 3 4").is_err());
        assert!(parse_line("LINESTRING(1 2)").is_err());
        assert!(parse_polygon("POLYGON((0 0, 1 0, 0 0))").is_err());
        assert!(parse_polygon("POLYGON((0 0, 4 0, 4 4, 0 0), (1 1, 2 1, 1 2, 1 1))").is_err());
    }

    #[test]
    fn test_parse_polygon_closes_open_ring() {
        let ring = parse_polygon("POLYGON((0 0, 1 0, 1 1, 0 1))").unwrap();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn test_decode_site_swaps_location() {
        let row = SiteRow {
            id: 3,
            name: "Cerro San Cristobal".into(),
            description: String::new(),
            category: "Parque".into(),
            location: StorePoint::new(-70.6326, -33.4253),
            average_rating: 4.8,
            review_count: 310,
        };
        let site = decode_site(row);
        assert_eq!(site.location, GeoPoint::new(-33.4253, -70.6326));
        assert_eq!(site.review_count, 310);
    }

    #[test]
    fn test_from_lat_lon_pairs() {
        let points = from_lat_lon_pairs(&[vec![-33.4, -70.6], vec![-33.5, -70.7]]).unwrap();
        assert_eq!(points[0], GeoPoint::new(-33.4, -70.6));
        assert_eq!(points[1].longitude, -70.7);

        let err = from_lat_lon_pairs(&[vec![-33.4]]).unwrap_err();
        assert!(matches!(err, TourGeoError::InvalidGeometry(_)));
        assert!(from_lat_lon_pairs(&[vec![1.0, 2.0, 3.0]]).is_err());
    }

    #[test]
    fn test_decode_exchange_line() {
        let geometry = Geometry::new(Value::LineString(vec![
            vec![-70.6506, -33.4372],
            vec![-70.6413, -33.4405],
        ]));
        let path = decode_exchange_line(&geometry).unwrap();
        assert_eq!(path[0], GeoPoint::new(-33.4372, -70.6506));
        assert_eq!(path[1], GeoPoint::new(-33.4405, -70.6413));

        let point = Geometry::new(Value::Point(vec![1.0, 2.0]));
        assert!(decode_exchange_line(&point).is_err());
    }
}
