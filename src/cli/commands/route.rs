use serde_json::json;

use crate::auth::{guard, GuardOutcome};
use crate::cli::config::CliContext;
use crate::cli::utils::print_json;
use crate::cli::OutputFormat;
use crate::routes::Route;

/// Where would the app send the current session for `path`?
pub async fn handle(path: String, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = CliContext::connect().await?;
    let route = Route::parse(&path);
    let session = ctx.session().session().await;
    let outcome = guard(&route, &session);
    let is_admin = session.user.as_ref().map(|u| u.is_admin()).unwrap_or(false);
    let forbidden = matches!(outcome, GuardOutcome::Render(_)) && route.requires_admin() && !is_admin;

    let (verdict, target) = match &outcome {
        GuardOutcome::Render(_) if forbidden => ("forbidden", route.clone()),
        GuardOutcome::Render(r) => ("render", r.clone()),
        GuardOutcome::Redirect(r) => ("redirect", r.clone()),
    };

    match output_format {
        OutputFormat::Json => print_json(&json!({
            "path": path,
            "route": route.path(),
            "outcome": verdict,
            "target": target.path(),
            "protected": route.is_protected(),
            "requires_admin": route.requires_admin(),
        })),
        OutputFormat::Text => {
            match verdict {
                "render" => println!("{} renders {}", path, target),
                "redirect" => println!("{} redirects to {}", path, target),
                _ => println!("{} is admin-only; the view refuses this session", path),
            }
            Ok(())
        }
    }
}
