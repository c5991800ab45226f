/// A decoy target advertised to crawlers. `path` has no legitimate use on
/// the site; anything requesting or clicking it is probing.
#[derive(Debug, Clone, Copy)]
pub struct Trap {
    pub path: &'static str,
    pub label: &'static str,
}

/// The decoy set the site exposes through invisible links. Labels mimic
/// what a scanner's link-text heuristics expect to find.
pub const TRAPS: &[Trap] = &[
    Trap { path: "/admin-login", label: "Admin Panel" },
    Trap { path: "/wp-admin", label: "WordPress Admin" },
    Trap { path: "/.env", label: "Environment Variables" },
    Trap { path: "/api/users", label: "User API" },
    Trap { path: "/phpmyadmin", label: "phpMyAdmin" },
    Trap { path: "/config.php", label: "Config File" },
];

/// Render the hidden trap links as an HTML fragment.
///
/// The wrapper is invisible to regular users (`display:none`, aria-hidden,
/// no tab focus) but link-following scrapers will collect and hit the
/// targets. Each anchor carries `data-trap` so the tracking script can
/// report the click as a honeypot trigger before navigation.
pub fn hidden_links_html() -> String {
    let mut html = String::from(r#"<div style="display:none" aria-hidden="true">"#);
    for trap in TRAPS {
        html.push_str(&format!(
            r#"<a href="{path}" data-trap="hidden-link" tabindex="-1">{label}</a>"#,
            path = trap.path,
            label = trap.label,
        ));
    }
    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_is_hidden_and_unfocusable() {
        let html = hidden_links_html();
        assert!(html.starts_with(r#"<div style="display:none" aria-hidden="true">"#));
        assert!(html.ends_with("</div>"));
        assert!(html.contains(r#"tabindex="-1""#));
    }

    #[test]
    fn every_trap_is_linked() {
        let html = hidden_links_html();
        for trap in TRAPS {
            assert!(html.contains(&format!(r#"href="{}""#, trap.path)), "missing {}", trap.path);
        }
    }

    #[test]
    fn links_carry_the_trap_marker() {
        let html = hidden_links_html();
        assert_eq!(html.matches(r#"data-trap="hidden-link""#).count(), TRAPS.len());
    }
}
