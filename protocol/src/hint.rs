use serde::{Deserialize, Serialize};
use serde_json::Value;
use sweephint_core::{CellCount, Coord, Coord2, HintStep, Observation};

use crate::Result;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HintCell {
    /// Only disclosed for uncovered cells.
    pub is_mine: Option<bool>,
    pub is_visible: bool,
    pub is_flagged: bool,
    pub location: Coord2,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HintRequest {
    pub grid: Vec<Vec<HintCell>>,
    pub width: Coord,
    pub height: Coord,
    pub mines: CellCount,
    pub start_x: Coord,
    pub start_y: Coord,
}

impl HintRequest {
    pub fn from_observation(obs: &Observation) -> Self {
        let grid = obs
            .cells
            .rows()
            .into_iter()
            .enumerate()
            .map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .map(|(x, &cell)| HintCell {
                        is_mine: cell.disclosed_mine(),
                        is_visible: cell.is_visible(),
                        is_flagged: cell.is_flagged(),
                        // observation dimensions are bounded by `Coord`
                        location: (x as Coord, y as Coord),
                    })
                    .collect()
            })
            .collect();

        Self {
            grid,
            width: obs.size.0,
            height: obs.size.1,
            mines: obs.mine_count,
            start_x: obs.start.0,
            start_y: obs.start.1,
        }
    }
}

/// One step as it travels on the wire; coordinates are checked on conversion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireHintStep {
    pub text: String,
    #[serde(default)]
    pub hidden_cells_to_highlight: Vec<(i64, i64)>,
    #[serde(default)]
    pub revealed_cells_to_highlight: Vec<(i64, i64)>,
}

impl WireHintStep {
    pub fn into_step(self) -> HintStep {
        HintStep::new(
            self.text,
            to_coords(self.hidden_cells_to_highlight),
            to_coords(self.revealed_cells_to_highlight),
        )
    }
}

impl From<&HintStep> for WireHintStep {
    fn from(step: &HintStep) -> Self {
        let to_wire = |cells: &[Coord2]| {
            cells
                .iter()
                .map(|&(x, y)| (i64::from(x), i64::from(y)))
                .collect()
        };
        Self {
            text: step.text.clone(),
            hidden_cells_to_highlight: to_wire(&step.hidden_cells_to_highlight),
            revealed_cells_to_highlight: to_wire(&step.revealed_cells_to_highlight),
        }
    }
}

fn to_coords(cells: Vec<(i64, i64)>) -> Vec<Coord2> {
    cells
        .into_iter()
        .filter_map(|(x, y)| match (Coord::try_from(x), Coord::try_from(y)) {
            (Ok(x), Ok(y)) => Some((x, y)),
            _ => {
                log::warn!("Dropping hint coordinate [{}, {}]", x, y);
                None
            }
        })
        .collect()
}

/// `{"hint": [...]}`. The hint is kept as raw JSON so a degenerate payload is not an error.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HintResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<Value>,
}

impl HintResponse {
    pub fn new(steps: &[HintStep]) -> Result<Self> {
        let steps: Vec<WireHintStep> = steps.iter().map(WireHintStep::from).collect();
        Ok(Self {
            hint: Some(serde_json::to_value(steps)?),
        })
    }

    /// Decodes a response body. Anything that is not a non-empty list of steps is `None`.
    pub fn parse(body: &str) -> Option<Vec<HintStep>> {
        match serde_json::from_str::<HintResponse>(body) {
            Ok(response) => response.into_steps(),
            Err(err) => {
                log::warn!("Unreadable hint response: {}", err);
                None
            }
        }
    }

    pub fn into_steps(self) -> Option<Vec<HintStep>> {
        let Some(Value::Array(raw_steps)) = self.hint else {
            log::debug!("Hint response carries no step list");
            return None;
        };

        let steps: Vec<HintStep> = raw_steps
            .into_iter()
            .filter_map(|raw| match serde_json::from_value::<WireHintStep>(raw) {
                Ok(step) => Some(step.into_step()),
                Err(err) => {
                    log::warn!("Dropping malformed hint step: {}", err);
                    None
                }
            })
            .collect();

        if steps.is_empty() { None } else { Some(steps) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweephint_core::{Board, ObservedCell};

    #[test]
    fn request_hides_covered_mines() {
        let mut board = Board::from_mine_coords((3, 2), (2, 1), &[(0, 0)]).unwrap();
        board.reveal((2, 1)).unwrap();
        board.flag_square((0, 0)).unwrap();

        let request = HintRequest::from_observation(&Observation::from_board(&board));

        assert_eq!((request.width, request.height, request.mines), (3, 2, 1));
        assert_eq!((request.start_x, request.start_y), (2, 1));
        assert_eq!(request.grid.len(), 2);
        assert_eq!(
            request.grid[0][0],
            HintCell {
                is_mine: None,
                is_visible: false,
                is_flagged: true,
                location: (0, 0),
            }
        );
        assert_eq!(request.grid[1][2].is_mine, Some(false));
        assert!(request.grid.iter().flatten().all(|cell| cell.is_mine != Some(true)));
    }

    #[test]
    fn request_serializes_locations_as_pairs() {
        let board = Board::from_mine_coords((2, 1), (0, 0), &[(1, 0)]).unwrap();
        let obs = Observation::from_board(&board);
        assert_eq!(obs.cell_at((1, 0)), Some(ObservedCell::Hidden));

        let json = serde_json::to_value(HintRequest::from_observation(&obs)).unwrap();

        assert_eq!(
            json["grid"][0][1],
            serde_json::json!({"isMine": null, "isVisible": false, "isFlagged": false, "location": [1, 0]})
        );
        assert_eq!(json["startX"], 0);
    }

    #[test]
    fn parses_steps() {
        let body = r#"{"hint": [
            {"text": "This 1 already touches a flag", "hiddenCellsToHighlight": [[2, 0]], "revealedCellsToHighlight": [[1, 1]]},
            {"text": "So this cell is safe", "hiddenCellsToHighlight": [[2, 0]], "revealedCellsToHighlight": []}
        ]}"#;

        let steps = HintResponse::parse(body).unwrap();

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].hidden_cells_to_highlight, vec![(2, 0)]);
        assert_eq!(steps[0].revealed_cells_to_highlight, vec![(1, 1)]);
        assert!(steps.iter().all(|step| !step.active));
    }

    #[test]
    fn degenerate_hints_are_none() {
        assert_eq!(HintResponse::parse("{}"), None);
        assert_eq!(HintResponse::parse(r#"{"hint": null}"#), None);
        assert_eq!(HintResponse::parse(r#"{"hint": "none"}"#), None);
        assert_eq!(HintResponse::parse(r#"{"hint": []}"#), None);
        assert_eq!(HintResponse::parse(r#"{"hint": [{"nope": 1}]}"#), None);
        assert_eq!(HintResponse::parse("not json"), None);
    }

    #[test]
    fn out_of_range_coordinates_are_dropped() {
        let body = r#"{"hint": [{"text": "t", "hiddenCellsToHighlight": [[-1, 0], [300, 1], [4, 5]]}]}"#;

        let steps = HintResponse::parse(body).unwrap();

        assert_eq!(steps[0].hidden_cells_to_highlight, vec![(4, 5)]);
        assert!(steps[0].revealed_cells_to_highlight.is_empty());
    }

    #[test]
    fn response_from_steps_parses_back() {
        let steps = vec![HintStep::new("flag it", vec![(0, 0)], vec![(1, 0), (1, 1)])];

        let body = serde_json::to_string(&HintResponse::new(&steps).unwrap()).unwrap();

        assert_eq!(HintResponse::parse(&body), Some(steps));
    }
}
