//! Generation Prompt and Response Schema
//!
//! The instruction and the structural schema sent with every library fetch.
//! Both are fixed configuration: the caller only chooses how many books to
//! ask for.

use serde_json::{json, Value};

/// Every field of a book record; all of them are required in the output
pub const BOOK_FIELDS: [&str; 8] = [
    "id",
    "title",
    "author",
    "coverImageUrl",
    "description",
    "genres",
    "rating",
    "publishedYear",
];

/// Genres the instruction asks the model to mix
pub const GENRE_MIX: [&str; 7] = [
    "Fantasy",
    "Science Fiction",
    "Mystery",
    "Thriller",
    "Romance",
    "Historical Fiction",
    "Classic Literature",
];

/// Schema of a single book record, in the service's schema dialect
#[must_use]
pub fn book_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "id": {
                "type": "STRING",
                "description": "A unique identifier for the book, like a UUID."
            },
            "title": {
                "type": "STRING",
                "description": "The title of the book."
            },
            "author": {
                "type": "STRING",
                "description": "The name of the author."
            },
            "coverImageUrl": {
                "type": "STRING",
                "description": "A placeholder image URL from picsum.photos, e.g., https://picsum.photos/400/600"
            },
            "description": {
                "type": "STRING",
                "description": "A detailed, engaging summary of the book plot (at least 100 words)."
            },
            "genres": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "A list of genre tags for the book."
            },
            "rating": {
                "type": "NUMBER",
                "description": "A rating from 1 to 5, can include one decimal place (e.g., 4.5)."
            },
            "publishedYear": {
                "type": "INTEGER",
                "description": "The year the book was published."
            }
        },
        "required": BOOK_FIELDS,
    })
}

/// Schema of the whole response: an array of book records
#[must_use]
pub fn library_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": book_schema(),
    })
}

/// The fixed natural-language instruction for `count` books
#[must_use]
pub fn library_prompt(count: usize) -> String {
    format!(
        "Generate a diverse list of {count} fictional e-books for a digital library.\n\
         - Ensure a mix of genres: {genres}.\n\
         - Provide creative and realistic titles and author names.\n\
         - For coverImageUrl, use a unique placeholder image from picsum.photos with a 2:3 aspect ratio \
         (e.g., 'https://picsum.photos/seed/a-unique-seed/400/600'). Use a different seed for each book.\n\
         - Write a detailed, engaging summary for each book's description (at least 100 words).\n\
         - Ratings should be between 3.0 and 5.0 and can have one decimal place.\n\
         - Publication years should range from the 1800s to the present day.",
        genres = GENRE_MIX.join(", "),
    )
}
