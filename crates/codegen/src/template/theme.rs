//! Accent palette for the generated template, derived from the project name.
//!
//! Colors are emitted as CSS `hsl()` values so the browser does the
//! conversion; only the base hue depends on the name.

/// CSS custom property, hue offset, saturation %, lightness %.
const ROLES: [(&str, u16, u8, u8); 4] = [
    ("--primary", 0, 65, 45),
    ("--primary-light", 0, 65, 95),
    ("--primary-dark", 0, 65, 30),
    ("--accent", 180, 55, 50),
];

/// Base hue (0..360) for a project name. Case and punctuation are ignored,
/// so "Vendor Audit" and "vendor-audit" share a palette.
fn base_hue(name: &str) -> u16 {
    let folded = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase() as u32)
        .fold(17u32, |acc, c| acc.wrapping_mul(31) ^ c);
    (folded % 360) as u16
}

fn css_hsl(hue: u16, saturation: u8, lightness: u8) -> String {
    format!("hsl({} {}% {}%)", hue % 360, saturation, lightness)
}

/// `:root` declarations for the accent colors, one per line.
pub(crate) fn palette_declarations(name: &str) -> String {
    let hue = base_hue(name);
    ROLES
        .iter()
        .map(|(property, offset, s, l)| format!("  {}: {};\n", property, css_hsl(hue + offset, *s, *l)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hue_ignores_case_and_punctuation() {
        assert_eq!(base_hue("Vendor Audit"), base_hue("vendor-audit"));
        assert_ne!(base_hue("Vendor Audit"), base_hue("Clinic Scheduler"));
        assert!(base_hue("") < 360);
    }

    #[test]
    fn accent_is_opposite_the_primary() {
        let css = palette_declarations("Clinic Scheduler");
        let hue = base_hue("Clinic Scheduler");
        assert!(css.contains(&format!("  --primary: hsl({} 65% 45%);\n", hue)));
        assert!(css.contains(&format!("  --accent: hsl({} 55% 50%);\n", (hue + 180) % 360)));
        assert_eq!(css.lines().count(), ROLES.len());
    }
}
