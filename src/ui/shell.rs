use super::Viewer;
use super::components::escape;

/// Top-level pages, in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Dashboard,
    Profile,
    Automation,
    Analytics,
    Settings,
}

impl Nav {
    const ALL: [Nav; 5] = [Nav::Dashboard, Nav::Profile, Nav::Automation, Nav::Analytics, Nav::Settings];

    fn href(self) -> &'static str {
        match self {
            Self::Dashboard => "/",
            Self::Profile => "/profile",
            Self::Automation => "/automation",
            Self::Analytics => "/analytics",
            Self::Settings => "/settings",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Profile => "Profile",
            Self::Automation => "Automation",
            Self::Analytics => "Analytics",
            Self::Settings => "Settings",
        }
    }
}

fn head(title: &str) -> String {
    format!(
        r#"<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Job application automation dashboard">
    <title>{title} - ApplyPilot</title>

    <!-- HTMX (local) -->
    <script src="/static/vendor/htmx-2.0.8.min.js"></script>
    <link rel="stylesheet" href="/static/app.css">
</head>"#,
        title = escape(title)
    )
}

/// Full page with navigation, account menu and the `#flash` message area.
pub fn html_shell(title: &str, active: Nav, viewer: &Viewer, content: &str) -> String {
    let links: String = Nav::ALL
        .iter()
        .map(|nav| {
            let class = if *nav == active { "nav-link active" } else { "nav-link" };
            format!(r#"<a href="{}" class="{class}">{}</a>"#, nav.href(), nav.label())
        })
        .collect();

    let account = if viewer.signed_in {
        format!(
            r#"<span class="account-name">{}</span>
                    <button class="btn btn-ghost" hx-post="/logout">Sign out</button>"#,
            escape(&viewer.account.display_name())
        )
    } else {
        r#"<span class="badge tone-orange">Demo mode</span>
                    <a href="/login" class="btn btn-ghost">Sign in</a>"#
            .to_string()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
{head}
<body>
    <div id="app-shell">
        <header class="app-header">
            <div class="container header-row">
                <a href="/" class="brand">ApplyPilot</a>
                <nav class="nav" hx-boost="true">{links}</nav>
                <div class="account">
                    {account}
                </div>
            </div>
        </header>

        <main id="app" class="container">
            <div id="flash" aria-live="polite"></div>
            {content}
        </main>

        <footer class="app-footer">
            <p class="container muted">ApplyPilot · Axum + HTMX</p>
        </footer>
    </div>
</body>
</html>"#,
        head = head(title),
    )
}

/// Centered card layout for the login and registration pages.
pub fn auth_shell(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
{head}
<body class="auth-body">
    <main class="auth-card card">
        <h1 class="brand">ApplyPilot</h1>
        <div id="flash" aria-live="polite"></div>
        {content}
    </main>
</body>
</html>"#,
        head = head(title),
    )
}
