//! Effects - side effects declared by the reducer

/// Each fetch carries the token of the state slot it will fill.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Fetch one listing page
    FetchPage { token: u64, offset: u32, limit: u32 },
    /// Download the card preview for one entry of the page `token` loaded
    FetchThumbnail { token: u64, id: u32, url: String },
    /// Fetch the full record for one entry
    FetchDetail { token: u64, id: u32 },
    /// Download and decode the official artwork
    FetchArtwork { token: u64, url: String },
}
