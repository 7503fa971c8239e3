use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Number of squares on a board (5x5 grid, row-major).
pub const GRID_SQUARES: usize = 25;
/// Index of the pinned center square in the 25-element sequence.
pub const CENTER_INDEX: usize = 12;
/// Content of a freshly created center square.
pub const FREE_SQUARE_TEXT: &str = "FREE";

/// Character caps enforced by the editing boundary (not by the model itself).
pub const MAX_TITLE_CHARS: usize = 50;
pub const MAX_DESCRIPTION_CHARS: usize = 200;
pub const MAX_SQUARE_CONTENT_CHARS: usize = 50;

/// One of the 25 cells in a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Square {
    pub id: String,
    /// Free text shown in the cell (capped at 50 characters when editing)
    pub content: String,
    /// Exactly one square per board is the pinned center, always at index 12
    #[serde(default)]
    pub is_center: bool,
}

impl Square {
    /// Mint a fresh square id.
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }
}

/// Named visual theme applied to a board's rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    Purple,
    Teal,
    Pink,
    Amber,
    Blue,
    Green,
}

impl Default for ColorScheme {
    fn default() -> Self {
        ColorScheme::Purple
    }
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 6] = [
        ColorScheme::Purple,
        ColorScheme::Teal,
        ColorScheme::Pink,
        ColorScheme::Amber,
        ColorScheme::Blue,
        ColorScheme::Green,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorScheme::Purple => "purple",
            ColorScheme::Teal => "teal",
            ColorScheme::Pink => "pink",
            ColorScheme::Amber => "amber",
            ColorScheme::Blue => "blue",
            ColorScheme::Green => "green",
        }
    }
}

impl std::str::FromStr for ColorScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "purple" => Ok(ColorScheme::Purple),
            "teal" => Ok(ColorScheme::Teal),
            "pink" => Ok(ColorScheme::Pink),
            "amber" => Ok(ColorScheme::Amber),
            "blue" => Ok(ColorScheme::Blue),
            "green" => Ok(ColorScheme::Green),
            _ => Err(format!("Invalid color scheme: {}", s)),
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named image slot on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSlot {
    Header,
    Footer,
    Center,
}

impl ImageSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSlot::Header => "header",
            ImageSlot::Footer => "footer",
            ImageSlot::Center => "center",
        }
    }
}

impl std::str::FromStr for ImageSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "header" => Ok(ImageSlot::Header),
            "footer" => Ok(ImageSlot::Footer),
            "center" => Ok(ImageSlot::Center),
            _ => Err(format!("Invalid image slot: {}", s)),
        }
    }
}

/// A named 5x5 grid configuration owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    /// Board title (capped at 50 characters when editing)
    pub title: String,
    /// Optional free-text description (capped at 200 characters when editing)
    pub description: String,
    /// Epoch milliseconds; immutable after creation
    pub created_at: i64,
    /// Epoch milliseconds; re-stamped by the store on every persisted mutation
    pub updated_at: i64,
    /// Owning user's id; set at creation, never reassigned
    pub user_id: String,
    pub color_scheme: ColorScheme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_image_url: Option<String>,
    /// Ordered sequence of exactly 25 squares, one center at index 12
    pub squares: Vec<Square>,
    /// Archived boards are excluded from default listings
    pub is_archived: bool,
}

impl Board {
    /// The pinned center square, if the grid carries one.
    pub fn center_square(&self) -> Option<&Square> {
        self.squares.iter().find(|s| s.is_center)
    }

    /// Whether the grid satisfies its shape invariant: 25 squares with
    /// exactly one center, positioned at index 12.
    pub fn has_valid_grid(&self) -> bool {
        self.squares.len() == GRID_SQUARES
            && self.squares.iter().filter(|s| s.is_center).count() == 1
            && self.squares[CENTER_INDEX].is_center
    }
}

/// A board as submitted to the store for creation; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBoard {
    pub title: String,
    pub description: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub user_id: String,
    pub color_scheme: ColorScheme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_image_url: Option<String>,
    pub squares: Vec<Square>,
    pub is_archived: bool,
}

impl NewBoard {
    /// Attach a store-assigned id, producing the persisted record.
    pub fn into_board(self, id: String) -> Board {
        Board {
            id,
            title: self.title,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
            user_id: self.user_id,
            color_scheme: self.color_scheme,
            header_image_url: self.header_image_url,
            footer_image_url: self.footer_image_url,
            center_image_url: self.center_image_url,
            squares: self.squares,
            is_archived: self.is_archived,
        }
    }
}

/// Partial board update. `None` leaves a field unchanged; for the image URL
/// fields the inner option distinguishes setting a URL (`Some(Some(url))`)
/// from clearing the slot (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub color_scheme: Option<ColorScheme>,
    pub header_image_url: Option<Option<String>>,
    pub footer_image_url: Option<Option<String>>,
    pub center_image_url: Option<Option<String>>,
    pub squares: Option<Vec<Square>>,
    pub is_archived: Option<bool>,
    /// Callers may stamp this; the store overrides it with its own clock.
    pub updated_at: Option<i64>,
}

impl BoardPatch {
    pub fn is_empty(&self) -> bool {
        *self == BoardPatch::default()
    }

    /// Fold a newer patch into this one; fields present in `newer` win.
    pub fn merge(&mut self, newer: BoardPatch) {
        if newer.title.is_some() {
            self.title = newer.title;
        }
        if newer.description.is_some() {
            self.description = newer.description;
        }
        if newer.color_scheme.is_some() {
            self.color_scheme = newer.color_scheme;
        }
        if newer.header_image_url.is_some() {
            self.header_image_url = newer.header_image_url;
        }
        if newer.footer_image_url.is_some() {
            self.footer_image_url = newer.footer_image_url;
        }
        if newer.center_image_url.is_some() {
            self.center_image_url = newer.center_image_url;
        }
        if newer.squares.is_some() {
            self.squares = newer.squares;
        }
        if newer.is_archived.is_some() {
            self.is_archived = newer.is_archived;
        }
        if newer.updated_at.is_some() {
            self.updated_at = newer.updated_at;
        }
    }

    /// Merge the provided fields into a board record.
    pub fn apply(&self, board: &mut Board) {
        if let Some(title) = &self.title {
            board.title = title.clone();
        }
        if let Some(description) = &self.description {
            board.description = description.clone();
        }
        if let Some(color_scheme) = self.color_scheme {
            board.color_scheme = color_scheme;
        }
        if let Some(url) = &self.header_image_url {
            board.header_image_url = url.clone();
        }
        if let Some(url) = &self.footer_image_url {
            board.footer_image_url = url.clone();
        }
        if let Some(url) = &self.center_image_url {
            board.center_image_url = url.clone();
        }
        if let Some(squares) = &self.squares {
            board.squares = squares.clone();
        }
        if let Some(is_archived) = self.is_archived {
            board.is_archived = is_archived;
        }
        if let Some(updated_at) = self.updated_at {
            board.updated_at = updated_at;
        }
    }
}

/// Public user projection; the store never exposes the password field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
}

/// Request to register a new account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

/// Request to log into an existing account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response after registering or logging in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user: User,
    pub success_message: String,
}

/// Response containing the active session user, if any.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActiveUserResponse {
    pub user: Option<User>,
}

/// Request for creating a new board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoardRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color_scheme: ColorScheme,
}

/// Request for updating board details; omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBoardRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub color_scheme: Option<ColorScheme>,
    pub is_archived: Option<bool>,
    pub squares: Option<Vec<Square>>,
    pub updated_at: Option<i64>,
}

impl UpdateBoardRequest {
    pub fn into_patch(self) -> BoardPatch {
        BoardPatch {
            title: self.title,
            description: self.description,
            color_scheme: self.color_scheme,
            squares: self.squares,
            is_archived: self.is_archived,
            updated_at: self.updated_at,
            ..BoardPatch::default()
        }
    }
}

/// Response after creating or updating a board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoardResponse {
    pub board: Board,
    pub success_message: String,
}

/// Response containing a list of boards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoardListResponse {
    pub boards: Vec<Board>,
}

/// Request to archive or unarchive a board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveBoardRequest {
    pub archive: bool,
}

/// Request to move one square to another square's position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoveSquareRequest {
    pub source_id: String,
    pub dest_id: String,
}

/// Request to replace a single square's text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSquareContentRequest {
    pub content: String,
}

/// Request to replace the full 25-square sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSquaresRequest {
    pub squares: Vec<Square>,
}

/// Public, read-only link to view a board without authentication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShareLinkResponse {
    pub share_url: String,
}

/// Result of an image upload: a displayable URL and a deletable path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadResult {
    pub url: String,
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_board() -> Board {
        let mut squares: Vec<Square> = (0..GRID_SQUARES)
            .map(|i| Square {
                id: format!("sq-{}", i),
                content: String::new(),
                is_center: i == CENTER_INDEX,
            })
            .collect();
        squares[CENTER_INDEX].content = FREE_SQUARE_TEXT.to_string();
        Board {
            id: "board-1".to_string(),
            title: "Trivia".to_string(),
            description: "Office trivia night".to_string(),
            created_at: 1702516122000,
            updated_at: 1702516122000,
            user_id: "user-1".to_string(),
            color_scheme: ColorScheme::Blue,
            header_image_url: None,
            footer_image_url: None,
            center_image_url: None,
            squares,
            is_archived: false,
        }
    }

    #[test]
    fn test_board_serializes_with_reference_field_names() {
        let board = sample_board();
        let json = serde_json::to_value(&board).unwrap();

        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("userId").is_some());
        assert!(json.get("colorScheme").is_some());
        assert!(json.get("isArchived").is_some());
        assert_eq!(json["colorScheme"], "blue");
        assert_eq!(json["squares"][12]["isCenter"], true);
        assert_eq!(json["squares"][12]["content"], "FREE");

        // Unset image slots are absent, not null
        assert!(json.get("headerImageUrl").is_none());
    }

    #[test]
    fn test_board_round_trips_through_json() {
        let board = sample_board();
        let json = serde_json::to_string(&board).unwrap();
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);
    }

    #[test]
    fn test_square_is_center_defaults_to_false() {
        let square: Square = serde_json::from_str(r#"{"id":"a","content":"x"}"#).unwrap();
        assert!(!square.is_center);
    }

    #[test]
    fn test_color_scheme_parsing() {
        for scheme in ColorScheme::ALL {
            assert_eq!(scheme.as_str().parse::<ColorScheme>().unwrap(), scheme);
        }
        assert!("magenta".parse::<ColorScheme>().is_err());
        assert_eq!(ColorScheme::default(), ColorScheme::Purple);
    }

    #[test]
    fn test_image_slot_parsing() {
        assert_eq!("header".parse::<ImageSlot>().unwrap(), ImageSlot::Header);
        assert_eq!("footer".parse::<ImageSlot>().unwrap(), ImageSlot::Footer);
        assert_eq!("center".parse::<ImageSlot>().unwrap(), ImageSlot::Center);
        assert!("banner".parse::<ImageSlot>().is_err());
    }

    #[test]
    fn test_has_valid_grid() {
        let mut board = sample_board();
        assert!(board.has_valid_grid());

        // Center at the wrong index
        board.squares.swap(12, 13);
        assert!(!board.has_valid_grid());

        // Two centers
        let mut board = sample_board();
        board.squares[0].is_center = true;
        assert!(!board.has_valid_grid());

        // Wrong length
        let mut board = sample_board();
        board.squares.pop();
        assert!(!board.has_valid_grid());
    }

    #[test]
    fn test_patch_apply_merges_only_provided_fields() {
        let mut board = sample_board();
        let patch = BoardPatch {
            title: Some("Renamed".to_string()),
            header_image_url: Some(Some("data:image/png;base64,xyz".to_string())),
            ..BoardPatch::default()
        };
        patch.apply(&mut board);

        assert_eq!(board.title, "Renamed");
        assert_eq!(
            board.header_image_url.as_deref(),
            Some("data:image/png;base64,xyz")
        );
        // Untouched fields survive
        assert_eq!(board.description, "Office trivia night");
        assert_eq!(board.color_scheme, ColorScheme::Blue);
    }

    #[test]
    fn test_patch_apply_clears_image_slot() {
        let mut board = sample_board();
        board.header_image_url = Some("data:image/png;base64,xyz".to_string());

        let patch = BoardPatch {
            header_image_url: Some(None),
            ..BoardPatch::default()
        };
        patch.apply(&mut board);
        assert!(board.header_image_url.is_none());
    }

    #[test]
    fn test_patch_merge_latest_wins() {
        let mut patch = BoardPatch {
            title: Some("First".to_string()),
            description: Some("Kept".to_string()),
            ..BoardPatch::default()
        };
        patch.merge(BoardPatch {
            title: Some("Second".to_string()),
            is_archived: Some(true),
            ..BoardPatch::default()
        });

        assert_eq!(patch.title.as_deref(), Some("Second"));
        assert_eq!(patch.description.as_deref(), Some("Kept"));
        assert_eq!(patch.is_archived, Some(true));
    }

    #[test]
    fn test_update_board_request_into_patch() {
        let request = UpdateBoardRequest {
            title: Some("Edited".to_string()),
            color_scheme: Some(ColorScheme::Teal),
            ..UpdateBoardRequest::default()
        };
        let patch = request.into_patch();
        assert_eq!(patch.title.as_deref(), Some("Edited"));
        assert_eq!(patch.color_scheme, Some(ColorScheme::Teal));
        assert!(patch.squares.is_none());
        assert!(patch.header_image_url.is_none());
    }
}
