//! Parser for the public transit path search payload.
//!
//! The provider is loose with types: coordinates and durations arrive as
//! numbers or as numeric strings, and walking sub-paths usually carry no
//! coordinates at all. Walking endpoints are therefore inferred from the
//! neighbouring segments, and from the query itself at both ends.

use geo::Coord;
use log::warn;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::itinerary::{Itinerary, Segment, TransitQuery, TravelMode};
use crate::Error;

/// Path search endpoint of the provider
pub const SEARCH_PATH_URL: &str = "https://api.odsay.com/v1/api/searchPubTransPathT";

/// Query parameters of a path search, without the credential
pub fn search_params(query: &TransitQuery) -> [(&'static str, String); 4] {
    [
        ("SX", query.start.x.to_string()),
        ("SY", query.start.y.to_string()),
        ("EX", query.end.x.to_string()),
        ("EY", query.end.y.to_string()),
    ]
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    fn value(&self) -> Option<f64> {
        match self {
            Numeric::Number(n) => Some(*n).filter(|n| n.is_finite()),
            Numeric::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }
}

fn numeric(field: &Option<Numeric>) -> Option<f64> {
    field.as_ref().and_then(Numeric::value)
}

fn point(x: &Option<Numeric>, y: &Option<Numeric>) -> Option<Coord<f64>> {
    Some(Coord {
        x: numeric(x)?,
        y: numeric(y)?,
    })
}

#[derive(Debug, Deserialize)]
struct Envelope {
    result: Option<RawResult>,
    error: Option<JsonValue>,
}

#[derive(Debug, Deserialize)]
struct RawResult {
    #[serde(default)]
    path: Vec<RawPath>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPath {
    info: Option<RawInfo>,
    #[serde(default)]
    sub_path: Vec<RawSubPath>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInfo {
    total_time: Option<Numeric>,
    total_distance: Option<Numeric>,
    payment: Option<Numeric>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSubPath {
    traffic_type: Option<Numeric>,
    section_time: Option<Numeric>,
    distance: Option<Numeric>,
    start_x: Option<Numeric>,
    start_y: Option<Numeric>,
    end_x: Option<Numeric>,
    end_y: Option<Numeric>,
    pass_stop_list: Option<RawStopList>,
}

#[derive(Debug, Deserialize)]
struct RawStopList {
    #[serde(default)]
    stations: Vec<RawStation>,
}

#[derive(Debug, Deserialize)]
struct RawStation {
    x: Option<Numeric>,
    y: Option<Numeric>,
}

/// Parses a provider response body into itinerary alternatives, best first.
///
/// An `error` member, a missing `result` or an empty list of paths make the
/// payload malformed.
pub fn parse_odsay_response(body: &str, query: &TransitQuery) -> Result<Vec<Itinerary>, Error> {
    let envelope: Envelope = serde_json::from_str(body)?;

    if let Some(error) = envelope.error {
        return Err(Error::TransitPayload(format!("provider reported an error: {error}")));
    }
    let result = envelope
        .result
        .ok_or_else(|| Error::TransitPayload("response has no result".to_string()))?;
    if result.path.is_empty() {
        return Err(Error::TransitPayload("response lists no paths".to_string()));
    }

    Ok(result
        .path
        .iter()
        .map(|path| convert_path(path, query))
        .collect())
}

fn convert_path(path: &RawPath, query: &TransitQuery) -> Itinerary {
    let explicit: Vec<(Option<Coord<f64>>, Option<Coord<f64>>, Vec<Coord<f64>>)> = path
        .sub_path
        .iter()
        .map(|sub| {
            let stops: Vec<Coord<f64>> = sub
                .pass_stop_list
                .iter()
                .flat_map(|list| &list.stations)
                .filter_map(|station| point(&station.x, &station.y))
                .collect();
            let start = point(&sub.start_x, &sub.start_y).or_else(|| stops.first().copied());
            let end = point(&sub.end_x, &sub.end_y).or_else(|| stops.last().copied());
            (start, end, stops)
        })
        .collect();

    let mut segments: Vec<Segment> = Vec::with_capacity(path.sub_path.len());
    for (i, (sub, (start, end, stops))) in path.sub_path.iter().zip(&explicit).enumerate() {
        let mode = match numeric(&sub.traffic_type) {
            Some(code) => TravelMode::from_traffic_type(code as i64),
            None => {
                warn!("Sub-path {i} has no traffic type");
                TravelMode::Other
            }
        };

        let start = start
            .or_else(|| segments.last().map(|previous| previous.end))
            .unwrap_or(query.start);
        let end = end
            .or_else(|| explicit.get(i + 1).and_then(|(next_start, _, _)| *next_start))
            .unwrap_or(query.end);

        segments.push(Segment {
            mode,
            start,
            end,
            stops: stops.clone(),
            section_time: numeric(&sub.section_time).map_or(0, |t| t.max(0.0).round() as u32),
            distance: numeric(&sub.distance).map_or(0.0, |d| d.max(0.0)),
            safe_path: None,
        });
    }

    let info = path.info.as_ref();
    let total_time = info
        .and_then(|info| numeric(&info.total_time))
        .map_or_else(
            || segments.iter().map(|s| s.section_time).sum(),
            |t| t.max(0.0).round() as u32,
        );
    let total_distance = info
        .and_then(|info| numeric(&info.total_distance))
        .unwrap_or_else(|| segments.iter().map(|s| s.distance).sum());
    let payment = info
        .and_then(|info| numeric(&info.payment))
        .map_or(0, |p| p.max(0.0).round() as u32);

    Itinerary {
        segments,
        total_time,
        total_distance,
        payment,
        synthetic: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> TransitQuery {
        TransitQuery::new(Coord { x: 127.0, y: 37.49 }, Coord { x: 126.97, y: 37.55 })
    }

    const WALK_BUS_WALK: &str = r#"{
        "result": {
            "searchType": 0,
            "path": [{
                "pathType": 2,
                "info": { "totalTime": 31, "totalDistance": 6120, "payment": 1500 },
                "subPath": [
                    { "trafficType": 3, "sectionTime": 4, "distance": 250 },
                    {
                        "trafficType": 2, "sectionTime": 22, "distance": 5600,
                        "startX": 127.001, "startY": "37.491",
                        "endX": "126.975", "endY": 37.548,
                        "passStopList": { "stations": [
                            { "x": "127.001", "y": "37.491" },
                            { "x": "126.990", "y": "37.520" },
                            { "x": "126.975", "y": "37.548" }
                        ]}
                    },
                    { "trafficType": 3, "sectionTime": 5, "distance": 270 }
                ]
            }]
        }
    }"#;

    #[test]
    fn walking_endpoints_are_inferred_from_neighbours() {
        let itineraries = parse_odsay_response(WALK_BUS_WALK, &query()).unwrap();
        assert_eq!(itineraries.len(), 1);
        let itinerary = &itineraries[0];
        assert!(!itinerary.synthetic);
        assert_eq!(itinerary.total_time, 31);
        assert_eq!(itinerary.payment, 1500);

        let [first, bus, last] = itinerary.segments.as_slice() else {
            panic!("expected three segments");
        };
        assert_eq!(first.mode, TravelMode::Walk);
        assert_eq!(first.start, query().start);
        assert_eq!(first.end, Coord { x: 127.001, y: 37.491 });

        assert_eq!(bus.mode, TravelMode::Bus);
        assert_eq!(bus.stops.len(), 3);
        assert_eq!(bus.section_time, 22);

        assert_eq!(last.start, Coord { x: 126.975, y: 37.548 });
        assert_eq!(last.end, query().end);
    }

    #[test]
    fn totals_are_summed_when_info_is_missing() {
        let body = r#"{"result": {"path": [{"subPath": [
            {"trafficType": 3, "sectionTime": 3, "distance": 100},
            {"trafficType": 1, "sectionTime": 10, "distance": 4000,
             "startX": 1, "startY": 1, "endX": 2, "endY": 2}
        ]}]}}"#;
        let itinerary = &parse_odsay_response(body, &query()).unwrap()[0];
        assert_eq!(itinerary.total_time, 13);
        assert_eq!(itinerary.total_distance, 4100.0);
        assert_eq!(itinerary.segments[1].mode, TravelMode::Subway);
    }

    #[test]
    fn error_member_is_malformed() {
        let body = r#"{"error": {"code": "500", "message": "server error"}}"#;
        assert!(matches!(
            parse_odsay_response(body, &query()),
            Err(Error::TransitPayload(_))
        ));
    }

    #[test]
    fn missing_result_or_paths_are_malformed() {
        assert!(matches!(
            parse_odsay_response("{}", &query()),
            Err(Error::TransitPayload(_))
        ));
        assert!(matches!(
            parse_odsay_response(r#"{"result": {"path": []}}"#, &query()),
            Err(Error::TransitPayload(_))
        ));
        assert!(matches!(
            parse_odsay_response("not json", &query()),
            Err(Error::JsonError(_))
        ));
    }

    #[test]
    fn search_params_carry_both_endpoints() {
        let params = search_params(&query());
        assert_eq!(params[0], ("SX", "127".to_string()));
        assert_eq!(params[3], ("EY", "37.55".to_string()));
    }
}
