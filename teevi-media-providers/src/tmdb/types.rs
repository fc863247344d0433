//! TMDB API Data Structures

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Media type segment used in TMDB paths and show ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(Self::Movie),
            "tv" => Ok(Self::Tv),
            _ => Err(()),
        }
    }
}

/// One page of a paged TMDB listing (search, discover, recommendations)
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// One page of a user list (`list/{id}`)
#[derive(Debug, Deserialize)]
pub struct ListPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub items: Vec<ShowSummary>,
}

/// Movie or TV series as it appears in listings.
///
/// Movies carry `title`/`release_date`, series `name`/`first_air_date`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShowSummary {
    pub id: u64,
    #[serde(default)]
    pub media_type: Option<MediaType>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub popularity: f64,
}

impl ShowSummary {
    #[must_use]
    pub fn media_type(&self) -> MediaType {
        self.media_type.unwrap_or(if self.title.is_some() {
            MediaType::Movie
        } else {
            MediaType::Tv
        })
    }

    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }

    /// Release date for movies, first air date for series; empty counts as missing
    #[must_use]
    pub fn date(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .filter(|d| !d.is_empty())
            .or_else(|| self.first_air_date.as_deref().filter(|d| !d.is_empty()))
    }

    #[must_use]
    pub fn year(&self) -> Option<i32> {
        self.date()?.get(..4)?.parse().ok()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LastEpisode {
    #[serde(default)]
    pub runtime: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Season {
    pub season_number: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub episode_count: Option<u32>,
}

/// `movie/{id}` or `tv/{id}` detail
#[derive(Debug, Clone, Deserialize)]
pub struct ShowDetails {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    /// Movie runtime in minutes
    #[serde(default)]
    pub runtime: Option<u64>,
    #[serde(default)]
    pub episode_run_time: Vec<u64>,
    #[serde(default)]
    pub last_episode_to_air: Option<LastEpisode>,
    #[serde(default)]
    pub seasons: Vec<Season>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Episode {
    pub id: u64,
    pub episode_number: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub still_path: Option<String>,
    #[serde(default)]
    pub runtime: Option<u64>,
}

/// `tv/{id}/season/{n}`
#[derive(Debug, Clone, Deserialize)]
pub struct SeasonDetails {
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    pub file_path: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub iso_639_1: Option<String>,
}

impl Image {
    fn is_svg(&self) -> bool {
        self.file_path.ends_with("svg")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageCollection {
    #[serde(default)]
    pub posters: Vec<Image>,
    #[serde(default)]
    pub backdrops: Vec<Image>,
    #[serde(default)]
    pub logos: Vec<Image>,
}

impl ImageCollection {
    /// Best voted raster logo
    #[must_use]
    pub fn best_logo(&self) -> Option<&str> {
        best_voted(&self.logos, |image| !image.is_svg())
    }

    /// Best voted raster poster without text (no language)
    #[must_use]
    pub fn best_clean_poster(&self) -> Option<&str> {
        best_voted(&self.posters, |image| {
            image.iso_639_1.as_deref().is_none_or(str::is_empty) && !image.is_svg()
        })
    }
}

fn best_voted(images: &[Image], accept: impl Fn(&Image) -> bool) -> Option<&str> {
    let mut ranked: Vec<&Image> = images.iter().collect();
    ranked.sort_by(|a, b| b.vote_average.total_cmp(&a.vote_average));
    ranked
        .into_iter()
        .find(|image| accept(image))
        .map(|image| image.file_path.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_summary_kind_from_title() {
        let movie: ShowSummary =
            serde_json::from_str(r#"{"id":603,"title":"The Matrix","release_date":"1999-03-30","popularity":80.5}"#)
                .unwrap();
        assert_eq!(movie.media_type(), MediaType::Movie);
        assert_eq!(movie.year(), Some(1999));

        let series: ShowSummary =
            serde_json::from_str(r#"{"id":1399,"name":"Game of Thrones","first_air_date":""}"#).unwrap();
        assert_eq!(series.media_type(), MediaType::Tv);
        assert_eq!(series.display_title(), "Game of Thrones");
        assert!(series.date().is_none());
    }

    #[test]
    fn test_media_type_field_wins() {
        let item: ShowSummary =
            serde_json::from_str(r#"{"id":1,"media_type":"tv","title":"Odd"}"#).unwrap();
        assert_eq!(item.media_type(), MediaType::Tv);
    }

    #[test]
    fn test_best_images() {
        let images: ImageCollection = serde_json::from_str(
            r#"{
                "logos": [
                    {"file_path": "/a.svg", "vote_average": 9.0},
                    {"file_path": "/b.png", "vote_average": 5.0},
                    {"file_path": "/c.png", "vote_average": 7.0}
                ],
                "posters": [
                    {"file_path": "/en.jpg", "vote_average": 9.0, "iso_639_1": "en"},
                    {"file_path": "/clean.jpg", "vote_average": 4.0, "iso_639_1": null}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(images.best_logo(), Some("/c.png"));
        assert_eq!(images.best_clean_poster(), Some("/clean.jpg"));
    }

    #[test]
    fn test_media_type_parse() {
        assert_eq!("movie".parse::<MediaType>(), Ok(MediaType::Movie));
        assert!("person".parse::<MediaType>().is_err());
    }
}
