use clap::Subcommand;
use serde_json::json;

use crate::cli::config::CliContext;
use crate::cli::utils::*;
use crate::cli::{report, OutputFormat};
use crate::filter::{ExpertFilterMode, UserSortColumn};
use crate::models::{Industry, IndustryDraft, LocalGroup, LocalGroupDraft};
use crate::routes::Route;
use crate::types::UserStatus;
use crate::views::admin::{AdminPanel, AdminTab, ReferenceEntity, ReferenceTable};

#[derive(Subcommand)]
pub enum ReferenceCommands {
    #[command(about = "List entries")]
    List,
    #[command(about = "Create an entry")]
    Create {
        #[command(flatten)]
        fields: ReferenceFields,
    },
    #[command(about = "Update an entry by id")]
    Update {
        id: i64,
        #[command(flatten)]
        fields: ReferenceFields,
    },
    #[command(about = "Delete an entry by id")]
    Delete {
        id: i64,
        #[arg(long, help = "Do not ask for confirmation")]
        yes: bool,
    },
}

#[derive(clap::Args)]
pub struct ReferenceFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long, help = "Industries only")]
    pub description: Option<String>,
    #[arg(long, help = "Local groups only")]
    pub number: Option<String>,
}

#[derive(Subcommand)]
pub enum AdminCommands {
    #[command(about = "List members")]
    Users {
        #[arg(long)]
        status: Option<UserStatus>,
        #[arg(long, conflicts_with = "non_experts")]
        experts: bool,
        #[arg(long)]
        non_experts: bool,
        #[arg(long = "sort", help = "name, email, local_group or status; repeat to toggle direction")]
        sort: Vec<UserSortColumn>,
    },

    #[command(about = "Show the admin action log")]
    Actions,

    #[command(about = "Manage industry types")]
    Industries {
        #[command(subcommand)]
        cmd: ReferenceCommands,
    },

    #[command(about = "Manage local groups")]
    Groups {
        #[command(subcommand)]
        cmd: ReferenceCommands,
    },
}

/// Merge CLI flags into a draft
trait ApplyFields {
    fn apply(&mut self, fields: ReferenceFields);
}

impl ApplyFields for IndustryDraft {
    fn apply(&mut self, fields: ReferenceFields) {
        if let Some(v) = fields.name {
            self.name = v;
        }
        if let Some(v) = fields.description {
            self.description = v;
        }
    }
}

impl ApplyFields for LocalGroupDraft {
    fn apply(&mut self, fields: ReferenceFields) {
        if let Some(v) = fields.name {
            self.name = v;
        }
        if let Some(v) = fields.number {
            self.number = v;
        }
    }
}

pub async fn handle(cmd: AdminCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = CliContext::connect().await?;
    ctx.enter(Route::Admin).await?;
    let mut panel = AdminPanel::open(&ctx.client).await.map_err(|e| report(&ctx, &output_format, e))?;

    match cmd {
        AdminCommands::Users { status, experts, non_experts, sort } => {
            if panel.tab_error(AdminTab::Users).is_some() {
                panel.activate(AdminTab::Users, &ctx.client).await.map_err(|e| report(&ctx, &output_format, e))?;
            }
            panel.user_filter.status = status;
            panel.user_filter.experts = match (experts, non_experts) {
                (true, _) => ExpertFilterMode::Experts,
                (_, true) => ExpertFilterMode::NonExperts,
                _ => ExpertFilterMode::All,
            };
            for column in sort {
                panel.user_filter.toggle_sort(column);
            }

            let users = panel.users();
            if users.is_empty() {
                return output_empty_collection(&output_format, "users", "No users match these filters");
            }
            match output_format {
                OutputFormat::Json => print_json(&json!({ "users": users })),
                OutputFormat::Text => {
                    println!("{:<6} {:<26} {:<30} {:<20} {:<10} {}", "ID", "NAME", "EMAIL", "LOCAL GROUP", "STATUS", "EXPERT");
                    println!("{}", "-".repeat(100));
                    for user in &users {
                        println!(
                            "{:<6} {:<26} {:<30} {:<20} {:<10} {}",
                            user.id,
                            clip(&user.full_name(), 26),
                            clip(&user.email, 30),
                            clip(or_dash(user.local_group_name.as_deref()), 20),
                            user.status,
                            if user.is_expert { "yes" } else { "" }
                        );
                    }
                    Ok(())
                }
            }
        }
        AdminCommands::Actions => {
            panel.activate(AdminTab::Actions, &ctx.client).await.map_err(|e| report(&ctx, &output_format, e))?;
            let actions = panel.actions();
            if actions.is_empty() {
                return output_empty_collection(&output_format, "actions", "No admin actions recorded");
            }
            match output_format {
                OutputFormat::Json => print_json(&json!({ "actions": actions })),
                OutputFormat::Text => {
                    println!("{:<18} {:<20} {:<20} {}", "WHEN", "ADMIN", "TARGET", "ACTION");
                    println!("{}", "-".repeat(90));
                    for action in actions {
                        println!(
                            "{:<18} {:<20} {:<20} {}",
                            action.created_at.format("%Y-%m-%d %H:%M"),
                            clip(or_dash(action.admin.as_deref()), 20),
                            clip(or_dash(action.target_user.as_deref()), 20),
                            action.action
                        );
                    }
                    Ok(())
                }
            }
        }
        AdminCommands::Industries { cmd } => {
            panel.activate(AdminTab::Industries, &ctx.client).await.map_err(|e| report(&ctx, &output_format, e))?;
            run_reference(&ctx, &mut panel.industries, cmd, &output_format, |i: &Industry| {
                format!("{:<6} {:<30} {}", i.id, clip(&i.name, 30), i.description)
            })
            .await
        }
        AdminCommands::Groups { cmd } => {
            panel.activate(AdminTab::LocalGroups, &ctx.client).await.map_err(|e| report(&ctx, &output_format, e))?;
            run_reference(&ctx, &mut panel.local_groups, cmd, &output_format, |g: &LocalGroup| {
                format!("{:<6} {:<30} {}", g.id, clip(&g.name, 30), g.number)
            })
            .await
        }
    }
}

async fn run_reference<E>(
    ctx: &CliContext,
    table: &mut ReferenceTable<E>,
    cmd: ReferenceCommands,
    output_format: &OutputFormat,
    row: impl Fn(&E) -> String,
) -> anyhow::Result<()>
where
    E: ReferenceEntity,
    E::Draft: ApplyFields,
{
    match cmd {
        ReferenceCommands::List => {
            if table.rows().is_empty() {
                return output_empty_collection(output_format, "items", &format!("No {} entries", E::LABEL));
            }
            match output_format {
                OutputFormat::Json => print_json(&json!({ "items": table.rows() })),
                OutputFormat::Text => {
                    for item in table.rows() {
                        println!("{}", row(item));
                    }
                    Ok(())
                }
            }
        }
        ReferenceCommands::Create { fields } => {
            table.draft.apply(fields);
            let created = table.create(&ctx.client).await.map_err(|e| report(ctx, output_format, e))?;
            output_success(output_format, &format!("Created {} {}", E::LABEL, created.id()), Some(json!({ "item": created })))
        }
        ReferenceCommands::Update { id, fields } => {
            let draft = table.begin_edit(id).ok_or_else(|| anyhow::anyhow!("No {} with id {}", E::LABEL, id))?;
            draft.apply(fields);
            let saved = table.save_edit(id, &ctx.client).await.map_err(|e| report(ctx, output_format, e))?;
            output_success(output_format, &format!("Updated {} {}", E::LABEL, id), Some(json!({ "item": saved })))
        }
        ReferenceCommands::Delete { id, yes } => {
            let deleted = table
                .delete(id, &StdinConfirm { assume_yes: yes }, &ctx.client)
                .await
                .map_err(|e| report(ctx, output_format, e))?;
            let message = if deleted { format!("Deleted {} {}", E::LABEL, id) } else { "Nothing deleted".to_string() };
            output_success(output_format, &message, None)
        }
    }
}
