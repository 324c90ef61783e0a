use include_dir::{include_dir, Dir};
use itertools::Itertools;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::CatalogError;

static CATALOG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/catalog/data");

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Album {
    pub name: String,
    pub release_year: u16,
    pub cover_art: String,
    pub songs: Vec<String>,
}

/// One artist's discography, albums in release order
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Artist {
    #[serde(rename = "artist")]
    pub name: String,
    pub albums: Vec<Album>,
}

impl Artist {
    pub fn album(&self, name: &str) -> Option<&Album> {
        self.albums.iter().find(|album| album.name == name)
    }

    pub fn song_count(&self) -> usize {
        self.albums.iter().map(|album| album.songs.len()).sum()
    }
}

/// Which part of an artist's discography a session draws from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlbumChoice {
    All,
    Album(String),
}

impl AlbumChoice {
    pub fn label(&self) -> &str {
        match self {
            AlbumChoice::All => "All Albums",
            AlbumChoice::Album(name) => name,
        }
    }
}

/// The static artist -> album -> songs table. Loaded once, never mutated.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    artists: BTreeMap<String, Artist>,
}

impl Catalog {
    /// Load the catalog shipped inside the binary
    pub fn embedded() -> Result<Self, CatalogError> {
        let mut artists = Vec::new();
        for file in CATALOG_DIR
            .files()
            .filter(|f| f.path().extension().is_some_and(|ext| ext == "json"))
            .sorted_by(|a, b| a.path().cmp(b.path()))
        {
            let name = file.path().display().to_string();
            let contents = file
                .contents_utf8()
                .ok_or_else(|| CatalogError::MissingFile(name.clone()))?;
            let artist: Artist = serde_json::from_str(contents)
                .map_err(|source| CatalogError::Parse { file: name, source })?;
            artists.push(artist);
        }

        let catalog = Self::from_artists(artists);
        if catalog.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(catalog)
    }

    pub fn from_artists(artists: impl IntoIterator<Item = Artist>) -> Self {
        Self {
            artists: artists
                .into_iter()
                .map(|artist| (artist.name.clone(), artist))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.artists.is_empty()
    }

    pub fn artist_names(&self) -> impl Iterator<Item = &str> {
        self.artists.keys().map(String::as_str)
    }

    pub fn artist(&self, name: &str) -> Option<&Artist> {
        self.artists.get(name)
    }

    /// Album choices offered for an artist: "All Albums" first, then each album
    pub fn album_choices(&self, artist: &str) -> Vec<AlbumChoice> {
        let Some(artist) = self.artist(artist) else {
            return Vec::new();
        };
        std::iter::once(AlbumChoice::All)
            .chain(
                artist
                    .albums
                    .iter()
                    .map(|album| AlbumChoice::Album(album.name.clone())),
            )
            .collect()
    }

    /// Songs eligible for a selection. Duplicates present in the source data are kept.
    pub fn candidate_pool(&self, artist: &str, choice: &AlbumChoice) -> Vec<String> {
        let Some(artist) = self.artist(artist) else {
            return Vec::new();
        };
        match choice {
            AlbumChoice::All => artist
                .albums
                .iter()
                .flat_map(|album| album.songs.iter().cloned())
                .collect(),
            AlbumChoice::Album(name) => artist
                .album(name)
                .map(|album| album.songs.clone())
                .unwrap_or_default(),
        }
    }

    /// One-line summary shown under the album picker
    pub fn album_info(&self, artist: &str, choice: &AlbumChoice) -> Option<String> {
        let artist = self.artist(artist)?;
        match choice {
            AlbumChoice::All => Some(format!(
                "{} albums • {} songs",
                artist.albums.len(),
                artist.song_count()
            )),
            AlbumChoice::Album(name) => artist.album(name).map(|album| {
                format!(
                    "Released: {} • {} songs",
                    album.release_year,
                    album.songs.len()
                )
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_catalog() -> Catalog {
        Catalog::from_artists([Artist {
            name: "Test Artist".to_string(),
            albums: vec![
                Album {
                    name: "First".to_string(),
                    release_year: 2001,
                    cover_art: "first.jpg".to_string(),
                    songs: vec!["One".to_string(), "Two".to_string()],
                },
                Album {
                    name: "Second".to_string(),
                    release_year: 2003,
                    cover_art: "second.jpg".to_string(),
                    songs: vec!["Three".to_string(), "One".to_string(), "Four".to_string()],
                },
            ],
        }])
    }

    #[test]
    fn test_embedded_catalog_loads() {
        let catalog = Catalog::embedded().unwrap();

        assert!(!catalog.is_empty());
        let olivia = catalog.artist("Olivia Rodrigo").unwrap();
        assert_eq!(olivia.albums[0].name, "SOUR");
        assert_eq!(olivia.albums[0].release_year, 2021);
        assert!(olivia.albums[0].songs.contains(&"drivers license".to_string()));
    }

    #[test]
    fn test_embedded_catalog_has_every_artist() {
        let catalog = Catalog::embedded().unwrap();
        let names: Vec<&str> = catalog.artist_names().collect();

        for expected in [
            "Billie Eilish",
            "Dua Lipa",
            "Kanye West",
            "Lana Del Rey",
            "Olivia Rodrigo",
            "Tame Impala",
            "Taylor Swift",
            "The Weeknd",
        ] {
            assert!(names.contains(&expected), "missing {expected}");
        }
        // BTreeMap keeps artists sorted
        assert!(names.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_embedded_albums_are_non_empty() {
        let catalog = Catalog::embedded().unwrap();
        for name in catalog.artist_names() {
            let artist = catalog.artist(name).unwrap();
            assert!(!artist.albums.is_empty(), "{name} has no albums");
            for album in &artist.albums {
                assert!(!album.songs.is_empty(), "{} is empty", album.name);
            }
        }
    }

    #[test]
    fn test_album_choices_start_with_all() {
        let catalog = test_catalog();
        let choices = catalog.album_choices("Test Artist");

        assert_eq!(
            choices,
            vec![
                AlbumChoice::All,
                AlbumChoice::Album("First".to_string()),
                AlbumChoice::Album("Second".to_string()),
            ]
        );
        assert!(catalog.album_choices("Nobody").is_empty());
    }

    #[test]
    fn test_all_albums_pool_is_sum_of_albums() {
        let catalog = test_catalog();
        let pool = catalog.candidate_pool("Test Artist", &AlbumChoice::All);

        assert_eq!(pool.len(), 5);
        // duplicates from the source data survive, nothing else is added
        assert_eq!(pool.iter().filter(|s| *s == "One").count(), 2);
    }

    #[test]
    fn test_all_albums_pool_for_embedded_artist() {
        let catalog = Catalog::embedded().unwrap();
        let artist = catalog.artist("The Weeknd").unwrap();
        let pool = catalog.candidate_pool("The Weeknd", &AlbumChoice::All);

        let expected: usize = artist.albums.iter().map(|a| a.songs.len()).sum();
        assert_eq!(pool.len(), expected);
    }

    #[test]
    fn test_single_album_pool_keeps_order() {
        let catalog = test_catalog();
        let pool = catalog.candidate_pool("Test Artist", &AlbumChoice::Album("Second".into()));
        assert_eq!(pool, vec!["Three", "One", "Four"]);
    }

    #[test]
    fn test_unknown_selection_gives_empty_pool() {
        let catalog = test_catalog();
        assert!(catalog
            .candidate_pool("Test Artist", &AlbumChoice::Album("Third".into()))
            .is_empty());
        assert!(catalog.candidate_pool("Nobody", &AlbumChoice::All).is_empty());
    }

    #[test]
    fn test_album_info() {
        let catalog = test_catalog();

        assert_eq!(
            catalog.album_info("Test Artist", &AlbumChoice::Album("First".into())),
            Some("Released: 2001 • 2 songs".to_string())
        );
        assert_eq!(
            catalog.album_info("Test Artist", &AlbumChoice::All),
            Some("2 albums • 5 songs".to_string())
        );
        assert_eq!(catalog.album_info("Nobody", &AlbumChoice::All), None);
    }

    #[test]
    fn test_album_choice_label() {
        assert_eq!(AlbumChoice::All.label(), "All Albums");
        assert_eq!(AlbumChoice::Album("Currents".into()).label(), "Currents");
    }

    #[test]
    fn test_artist_deserialization() {
        let json_data = r#"
        {
            "artist": "test",
            "albums": [
                { "name": "a", "release_year": 1999, "cover_art": "a.jpg", "songs": ["x", "y"] }
            ]
        }
        "#;

        let artist: Artist = serde_json::from_str(json_data).unwrap();
        assert_eq!(artist.name, "test");
        assert_eq!(artist.song_count(), 2);
        assert_eq!(artist.album("a").unwrap().cover_art, "a.jpg");
    }
}
