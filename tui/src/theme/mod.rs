//! Theme and Colors
//!
//! storyshelf's palette: dark slate panels, teal accents, warm yellow stars.

use ratatui::style::Color;

// ============================================================================
// Text
// ============================================================================

/// Primary text - near white
pub const TEXT_PRIMARY: Color = Color::Rgb(243, 244, 246);

/// Secondary text - authors, years
pub const TEXT_SECONDARY: Color = Color::Rgb(156, 163, 175);

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

// ============================================================================
// Accents
// ============================================================================

/// Signature teal (brand, focused card, links)
pub const ACCENT_TEAL: Color = Color::Rgb(45, 212, 191);

/// Genre tags - lighter teal
pub const GENRE_TEAL: Color = Color::Rgb(94, 234, 212);

/// Filled star
pub const STAR_YELLOW: Color = Color::Rgb(250, 204, 21);

/// Empty star
pub const STAR_EMPTY: Color = Color::Rgb(75, 85, 99);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(248, 113, 113);

// ============================================================================
// Surfaces
// ============================================================================

/// Card border when not focused
pub const CARD_BORDER: Color = Color::Rgb(55, 65, 81);

/// Detail overlay background
pub const PANEL_BG: Color = Color::Rgb(31, 41, 55);
