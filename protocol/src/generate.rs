use serde::{Deserialize, Serialize};
use sweephint_core::{
    BoardConfig, BoardError, CellCount, CellSeed, Coord, Coord2, GenerateRequest, SeedGrid,
};

use crate::Result;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBoardRequest {
    pub width: Coord,
    pub height: Coord,
    pub mines: CellCount,
    pub start_x: Coord,
    pub start_y: Coord,
}

impl GenerateBoardRequest {
    /// Query-string form used by `GET /genboard`.
    pub fn to_query(&self) -> [(&'static str, String); 5] {
        [
            ("width", self.width.to_string()),
            ("height", self.height.to_string()),
            ("mines", self.mines.to_string()),
            ("startX", self.start_x.to_string()),
            ("startY", self.start_y.to_string()),
        ]
    }

    pub fn into_request(self) -> Result<GenerateRequest> {
        let config = BoardConfig::new_unchecked((self.width, self.height), self.mines).validate()?;
        let start = config.validate_coords((self.start_x, self.start_y))?;
        Ok(GenerateRequest { config, start })
    }
}

impl From<GenerateRequest> for GenerateBoardRequest {
    fn from(request: GenerateRequest) -> Self {
        let GenerateRequest { config, start } = request;
        Self {
            width: config.width(),
            height: config.height(),
            mines: config.mines,
            start_x: start.0,
            start_y: start.1,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCell {
    pub is_mine: bool,
    #[serde(default)]
    pub is_visible: bool,
    #[serde(default)]
    pub is_flagged: bool,
}

impl From<CellSeed> for WireCell {
    fn from(seed: CellSeed) -> Self {
        Self {
            is_mine: seed.is_mine,
            is_visible: seed.is_visible,
            is_flagged: seed.is_flagged,
        }
    }
}

impl From<WireCell> for CellSeed {
    fn from(cell: WireCell) -> Self {
        Self {
            is_mine: cell.is_mine,
            is_visible: cell.is_visible,
            is_flagged: cell.is_flagged,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireBoard {
    pub grid: Vec<Vec<WireCell>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateBoardResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub board: WireBoard,
}

impl GenerateBoardResponse {
    pub fn from_seed_grid(grid: &SeedGrid) -> Self {
        let grid: Vec<Vec<WireCell>> = grid
            .iter()
            .map(|row| row.iter().copied().map(WireCell::from).collect())
            .collect();
        let width = grid.first().map_or(0, Vec::len);
        Self {
            message: Some(format!("Generated board with width: {}, height: {}", width, grid.len())),
            board: WireBoard { grid },
        }
    }

    pub fn parse(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// Converts the grid, insisting on exactly `height` rows of `width` cells.
    pub fn into_seed_grid(self, (width, height): Coord2) -> Result<SeedGrid> {
        let grid = self.board.grid;
        if grid.len() != usize::from(height) || grid.iter().any(|row| row.len() != usize::from(width)) {
            log::warn!(
                "Generated grid has wrong shape, expected {}x{}, got {} rows",
                width,
                height,
                grid.len()
            );
            return Err(BoardError::InvalidBoardShape.into());
        }
        Ok(grid
            .into_iter()
            .map(|row| row.into_iter().map(CellSeed::from).collect())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProtocolError;

    #[test]
    fn request_uses_camel_case() {
        let request = GenerateBoardRequest {
            width: 9,
            height: 8,
            mines: 10,
            start_x: 3,
            start_y: 4,
        };

        let json = serde_json::to_value(request).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"width": 9, "height": 8, "mines": 10, "startX": 3, "startY": 4})
        );
        assert_eq!(request.to_query()[3], ("startX", "3".to_string()));
    }

    #[test]
    fn request_round_trips_through_core() {
        let core = GenerateRequest {
            config: BoardConfig::new_unchecked((16, 16), 40),
            start: (2, 5),
        };

        assert_eq!(GenerateBoardRequest::from(core).into_request().unwrap(), core);
    }

    #[test]
    fn request_with_start_outside_board_is_rejected() {
        let request = GenerateBoardRequest {
            width: 4,
            height: 4,
            mines: 2,
            start_x: 4,
            start_y: 0,
        };

        assert!(matches!(
            request.into_request(),
            Err(ProtocolError::Board(BoardError::InvalidCoords))
        ));
    }

    #[test]
    fn parses_response_grid() {
        let body = r#"{
            "message": "ok",
            "board": {"grid": [
                [{"isMine": true, "isVisible": false, "isFlagged": false},
                 {"isMine": false, "isVisible": false, "isFlagged": false}]
            ]}
        }"#;

        let grid = GenerateBoardResponse::parse(body)
            .unwrap()
            .into_seed_grid((2, 1))
            .unwrap();

        assert_eq!(grid, vec![vec![CellSeed::hidden(true), CellSeed::hidden(false)]]);
    }

    #[test]
    fn wrong_shape_is_rejected() {
        let response = GenerateBoardResponse::from_seed_grid(&vec![vec![CellSeed::default(); 3]; 2]);

        assert!(matches!(
            response.clone().into_seed_grid((2, 3)),
            Err(ProtocolError::Board(BoardError::InvalidBoardShape))
        ));
        assert!(response.into_seed_grid((3, 2)).is_ok());
    }

    #[test]
    fn missing_board_is_malformed() {
        assert!(matches!(
            GenerateBoardResponse::parse(r#"{"message": "nope"}"#),
            Err(ProtocolError::Json(_))
        ));
    }
}
