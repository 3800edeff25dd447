/// Used for colorless Trello labels and for colors Planka has no counterpart for.
pub const FALLBACK_COLOR: &str = "light-concrete";

const COLORS: &[(&str, &str)] = &[
    ("green", "bright-moss"),
    ("green_light", "sunny-grass"),
    ("green_dark", "tank-green"),
    ("yellow", "egg-yellow"),
    ("yellow_light", "desert-sand"),
    ("yellow_dark", "light-mud"),
    ("orange", "pumpkin-orange"),
    ("orange_light", "light-orange"),
    ("orange_dark", "orange-peel"),
    ("red", "berry-red"),
    ("red_light", "apricot-red"),
    ("red_dark", "red-burgundy"),
    ("purple", "pink-tulip"),
    ("purple_light", "light-cocoa"),
    ("purple_dark", "midnight-blue"),
    ("blue", "lagoon-blue"),
    ("blue_light", "morning-sky"),
    ("blue_dark", "navy-blue"),
    ("sky", "morning-sky"),
    ("sky_light", "antique-blue"),
    ("sky_dark", "lagune-blue"),
    ("lime", "coral-green"),
    ("lime_light", "sunny-grass"),
    ("lime_dark", "wet-moss"),
    ("pink", "pink-tulip"),
    ("pink_light", "light-cocoa"),
    ("pink_dark", "berry-red"),
    ("black", "dark-granite"),
    ("black_light", "gun-metal"),
    ("black_dark", "dark-granite"),
];

/// Maps a Trello label color to the Planka palette.
pub fn label_color(trello_color: Option<&str>) -> &'static str {
    trello_color
        .and_then(|color| COLORS.iter().find(|(t, _)| *t == color))
        .map(|(_, planka)| *planka)
        .unwrap_or(FALLBACK_COLOR)
}
