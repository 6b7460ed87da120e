//! PokeAPI client

use serde::Deserialize;
use tracing::debug;

use crate::artwork::{decode_artwork, Artwork};
use crate::error::{FetchFailure, FetchResult};
use crate::state::{AbilitySlot, BaseStat, CatalogEntryDetail, CatalogEntrySummary, CatalogPage};

// ============================================================================
// Response shapes
// ============================================================================

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    count: u32,
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    height: u32,
    weight: u32,
    types: Vec<PokemonTypeSlot>,
    abilities: Vec<PokemonAbilitySlot>,
    stats: Vec<PokemonStatSlot>,
    #[serde(default)]
    sprites: Sprites,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonAbilitySlot {
    ability: NamedResource,
    #[serde(default)]
    is_hidden: bool,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u16,
    stat: NamedResource,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct Sprites {
    other: Option<OtherSprites>,
}

#[derive(Clone, Debug, Deserialize)]
struct OtherSprites {
    #[serde(rename = "official-artwork")]
    official_artwork: Option<ArtworkSprites>,
}

#[derive(Clone, Debug, Deserialize)]
struct ArtworkSprites {
    front_default: Option<String>,
}

// ============================================================================
// Decoding
// ============================================================================

/// Decode a listing page. The endpoint has no numeric ids, so they are
/// derived from the offset: `offset + index + 1`.
pub fn parse_page(bytes: &[u8], offset: u32) -> FetchResult<CatalogPage> {
    let response: ListResponse = serde_json::from_slice(bytes)?;
    Ok(CatalogPage {
        total_count: response.count,
        entries: summaries_from_results(offset, response.results),
    })
}

fn summaries_from_results(offset: u32, results: Vec<NamedResource>) -> Vec<CatalogEntrySummary> {
    (offset + 1..)
        .zip(results)
        .map(|(id, entry)| CatalogEntrySummary {
            id,
            name: entry.name,
            source_url: entry.url,
        })
        .collect()
}

pub fn parse_detail(bytes: &[u8]) -> FetchResult<CatalogEntryDetail> {
    let response: PokemonResponse = serde_json::from_slice(bytes)?;
    let artwork_url = response
        .sprites
        .other
        .and_then(|other| other.official_artwork)
        .and_then(|artwork| artwork.front_default);

    Ok(CatalogEntryDetail {
        id: response.id,
        name: response.name,
        height: response.height,
        weight: response.weight,
        types: response
            .types
            .into_iter()
            .map(|slot| slot.type_info.name)
            .collect(),
        abilities: response
            .abilities
            .into_iter()
            .map(|slot| AbilitySlot {
                name: slot.ability.name,
                is_hidden: slot.is_hidden,
            })
            .collect(),
        stats: response
            .stats
            .into_iter()
            .map(|slot| BaseStat {
                name: slot.stat.name,
                base_value: slot.base_stat,
            })
            .collect(),
        artwork_url,
    })
}

// ============================================================================
// HTTP
// ============================================================================

/// Thin client over the catalog endpoints. Cheap to clone.
#[derive(Clone, Debug)]
pub struct CatalogClient {
    client: reqwest::Client,
    api_base: String,
}

impl CatalogClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
        }
    }

    pub fn page_url(&self, offset: u32, limit: u32) -> String {
        format!("{}/pokemon?limit={limit}&offset={offset}", self.api_base)
    }

    pub fn detail_url(&self, id: u32) -> String {
        format!("{}/pokemon/{id}", self.api_base)
    }

    pub async fn fetch_page(&self, offset: u32, limit: u32) -> FetchResult<CatalogPage> {
        let bytes = self.fetch_bytes(&self.page_url(offset, limit)).await?;
        parse_page(&bytes, offset)
    }

    pub async fn fetch_detail(&self, id: u32) -> FetchResult<CatalogEntryDetail> {
        let bytes = self.fetch_bytes(&self.detail_url(id)).await?;
        parse_detail(&bytes)
    }

    /// Download an image and shrink it to `cols` x `rows` cells off the async runtime.
    pub async fn fetch_artwork(&self, url: &str, cols: u32, rows: u32) -> FetchResult<Artwork> {
        let bytes = self.fetch_bytes(url).await?;
        tokio::task::spawn_blocking(move || decode_artwork(&bytes, cols, rows)).await?
    }

    async fn fetch_bytes(&self, url: &str) -> FetchResult<Vec<u8>> {
        debug!(url, "GET");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let bytes = response.bytes().await?;
        debug!(url, len = bytes.len(), "response body received");
        Ok(bytes.to_vec())
    }
}
