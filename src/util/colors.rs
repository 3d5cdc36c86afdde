use ratatui::style::Color;

pub const PRIMARY: Color = Color::from_u32(0x00fa586a);
pub const SECONDARY: Color = Color::from_u32(0x00a8323f);
pub const NEUTRAL: Color = Color::from_u32(0x00404040);
pub const MUTED: Color = Color::from_u32(0x008a8a8a);
pub const BACKGROUND: Color = Color::from_u32(0x000d0d0d);
