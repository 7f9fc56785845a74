use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// MPA rating, a reference into a small fixed rating table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mpa {
    pub id: i32,
    pub name: String,
}

/// Genre, a reference into the fixed genre table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

/// Director, a reference into the fixed director table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Director {
    pub id: i32,
    pub name: String,
}

/// Flat film row as it comes out of the store: the `films` columns plus the
/// joined MPA rating, without the many-to-many relations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilmRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub duration: i32,
    pub mpa: Option<Mpa>,
}

/// Complete film aggregate.
///
/// `genres` and `directors` are deduplicated and sorted ascending by id.
/// That ordering is established once, by hydration, so two `Film` values
/// with the same id compare equal no matter how they were loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Film {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub duration: i32,
    pub mpa: Option<Mpa>,
    pub genres: Vec<Genre>,
    pub directors: Vec<Director>,
}

impl Film {
    /// Assembles a film aggregate from its flat row and pre-sorted relations.
    pub fn from_parts(row: FilmRow, genres: Vec<Genre>, directors: Vec<Director>) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            release_date: row.release_date,
            duration: row.duration,
            mpa: row.mpa,
            genres,
            directors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> FilmRow {
        FilmRow {
            id: 7,
            title: "Heat".to_string(),
            description: "A heist crew against an obsessive detective".to_string(),
            release_date: NaiveDate::from_ymd_opt(1995, 12, 15).unwrap(),
            duration: 170,
            mpa: Some(Mpa {
                id: 4,
                name: "R".to_string(),
            }),
        }
    }

    #[test]
    fn test_from_parts_carries_row_fields() {
        let film = Film::from_parts(sample_row(), vec![], vec![]);
        assert_eq!(film.id, 7);
        assert_eq!(film.title, "Heat");
        assert_eq!(film.duration, 170);
        assert_eq!(film.mpa.as_ref().map(|m| m.id), Some(4));
        assert!(film.genres.is_empty());
        assert!(film.directors.is_empty());
    }

    #[test]
    fn test_film_equality_depends_on_relation_order() {
        let g1 = Genre {
            id: 1,
            name: "Crime".to_string(),
        };
        let g2 = Genre {
            id: 2,
            name: "Drama".to_string(),
        };
        let a = Film::from_parts(sample_row(), vec![g1.clone(), g2.clone()], vec![]);
        let b = Film::from_parts(sample_row(), vec![g2, g1], vec![]);
        // Same relations in a different order are not equal; hydration owns
        // the canonical ordering.
        assert_ne!(a, b);
    }
}
