use nih_plug_iced::Color;

/// colors and UI dimensions only
/// Audio-related constants are in audio::constants
pub struct UITheme;

impl UITheme {
    // === COLORS ===

    /// Background colors
    pub const BACKGROUND_MAIN: Color = Color {
        r: 0.114,
        g: 0.114,
        b: 0.114,
        a: 1.0,
    };

    /// Text and label colors
    pub const TEXT_PRIMARY: Color = Color {
        r: 0.9,
        g: 0.9,
        b: 0.9,
        a: 1.0,
    };
    pub const TEXT_SECONDARY: Color = Color {
        r: 0.6,
        g: 0.6,
        b: 0.6,
        a: 0.8,
    };

    /// Gate state readout
    pub const GATE_OPEN: Color = Color {
        r: 0.3,
        g: 1.0,
        b: 0.8,
        a: 1.0,
    }; // Cyan
    pub const GATE_CLOSED: Color = Color {
        r: 0.9,
        g: 0.4,
        b: 0.3,
        a: 1.0,
    };

    // === DIMENSIONS ===
    pub const TITLE_SIZE: u16 = 30;
    pub const LABEL_WIDTH: u16 = 80;
    pub const ROW_SPACING: u16 = 8;
    pub const PADDING_SMALL: u16 = 5;
}
