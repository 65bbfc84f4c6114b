//! Built-in tag table.
//!
//! Curated moods carry no provider reference of their own. Each maps to
//! the genre closest to it; the related words drive metadata affinity.

use super::TagCategory::{self, Aesthetic, Emotion, Mood, Theme, Vibe};
use crate::provider::ProviderKeyword::{self, Genre, Keyword};

const GENRE: TagCategory = TagCategory::Genre;

/// (tag, category, provider reference, related words)
pub(super) const BUILTIN_TAGS: &[(&str, TagCategory, ProviderKeyword, &[&str])] = &[
    // Moods
    (
        "feel-good",
        Mood,
        Keyword(6054),
        &["feel good", "uplifting", "heartwarming", "positive"],
    ),
    (
        "thought-provoking",
        Mood,
        Keyword(10051),
        &["thought provoking", "philosophical", "deep", "meaningful"],
    ),
    (
        "inspiring",
        Mood,
        Keyword(9748),
        &["inspiring", "motivational", "empowering", "heroic"],
    ),
    (
        "relaxing",
        Mood,
        Keyword(187056),
        &["relaxing", "calm", "peaceful", "tranquil"],
    ),
    (
        "exciting",
        Mood,
        Keyword(9715),
        &["exciting", "thrilling", "action", "adventure"],
    ),
    (
        "romantic",
        Mood,
        Keyword(9840),
        &["romantic", "love", "romance", "passion"],
    ),
    (
        "funny",
        Mood,
        Genre(35),
        &["funny", "comedy", "humorous", "hilarious"],
    ),
    (
        "sad",
        Mood,
        Keyword(10614),
        &["sad", "melancholy", "tragic", "emotional"],
    ),
    (
        "thrilling",
        Mood,
        Keyword(10410),
        &["thrilling", "suspense", "tension", "edge of seat"],
    ),
    (
        "mysterious",
        Mood,
        Keyword(10714),
        &["mysterious", "mystery", "enigmatic", "puzzling"],
    ),
    // Emotions
    (
        "melancholic",
        Emotion,
        Genre(18),
        &["melancholic", "sad", "lonely", "introspective", "bittersweet"],
    ),
    (
        "euphoric",
        Emotion,
        Genre(35),
        &["euphoric", "happy", "joyful", "uplifting", "feel good"],
    ),
    (
        "anxious",
        Emotion,
        Genre(53),
        &["anxious", "tense", "nervous", "thriller", "suspense"],
    ),
    (
        "nostalgic",
        Emotion,
        Genre(10751),
        &["nostalgic", "retro", "memory", "childhood", "past"],
    ),
    // Aesthetics
    (
        "neon-noir",
        Aesthetic,
        Genre(80),
        &["neon noir", "cyberpunk", "urban", "night", "neo noir"],
    ),
    (
        "cottagecore",
        Aesthetic,
        Genre(18),
        &["cottagecore", "rural", "pastoral", "cozy", "nature"],
    ),
    (
        "minimalist",
        Aesthetic,
        Genre(18),
        &["minimalist", "simple", "clean", "sparse", "quiet"],
    ),
    // Themes
    (
        "coming-of-age",
        Theme,
        Genre(18),
        &["coming of age", "youth", "growing up", "teenager", "adolescence"],
    ),
    (
        "forbidden-love",
        Theme,
        Genre(10749),
        &["forbidden love", "romance", "tragic", "star crossed", "impossible"],
    ),
    (
        "anti-establishment",
        Theme,
        Genre(18),
        &["anti establishment", "rebellion", "anarchist", "revolution", "protest"],
    ),
    // Vibes
    (
        "slow-burn",
        Vibe,
        Genre(9648),
        &["slow burn", "patient", "deliberate", "atmospheric", "meditative"],
    ),
    (
        "fever-dream",
        Vibe,
        Genre(14),
        &["fever dream", "surreal", "psychedelic", "dreamlike", "bizarre"],
    ),
    (
        "cozy-night-in",
        Vibe,
        Genre(10751),
        &["cozy night in", "comfort", "warm", "relaxing", "easy watch"],
    ),
    // Genres
    ("action", GENRE, Genre(28), &["action", "fight", "battle", "explosion"]),
    (
        "adventure",
        GENRE,
        Genre(12),
        &["adventure", "quest", "journey", "expedition"],
    ),
    ("comedy", GENRE, Genre(35), &["comedy", "funny", "humor", "joke"]),
    ("crime", GENRE, Genre(80), &["crime", "heist", "gangster", "detective"]),
    ("drama", GENRE, Genre(18), &["drama", "dramatic", "serious", "intense"]),
    ("fantasy", GENRE, Genre(14), &["fantasy", "magic", "mythical", "wizard"]),
    (
        "horror",
        GENRE,
        Genre(27),
        &["horror", "scary", "frightening", "terrifying"],
    ),
    (
        "sci-fi",
        GENRE,
        Genre(878),
        &["sci-fi", "science fiction", "futuristic", "space"],
    ),
    (
        "romance",
        GENRE,
        Genre(10749),
        &["romance", "love story", "romantic", "relationship"],
    ),
    (
        "thriller",
        GENRE,
        Genre(53),
        &["thriller", "suspense", "tension", "mystery"],
    ),
    (
        "documentary",
        GENRE,
        Genre(99),
        &["documentary", "real", "factual", "educational"],
    ),
    (
        "animation",
        GENRE,
        Genre(16),
        &["animation", "animated", "cartoon", "drawn"],
    ),
    (
        "family",
        GENRE,
        Genre(10751),
        &["family", "children", "kid friendly", "wholesome"],
    ),
    (
        "war",
        GENRE,
        Genre(10752),
        &["war", "soldier", "battlefield", "military"],
    ),
    (
        "western",
        GENRE,
        Genre(37),
        &["western", "cowboy", "frontier", "outlaw"],
    ),
];
