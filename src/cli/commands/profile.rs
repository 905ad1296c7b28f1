use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde_json::json;

use crate::api::ProfileTarget;
use crate::cli::config::CliContext;
use crate::cli::utils::*;
use crate::cli::{report, OutputFormat};
use crate::routes::Route;
use crate::types::{Availability, Role, UserStatus};
use crate::views::admin::ADMIN_REQUIRED;
use crate::views::profile::{ProfileEditor, EXPERT_SAVED, PHOTO_SAVED, PROFILE_SAVED};

#[derive(Args, Clone, Copy)]
pub struct TargetArgs {
    #[arg(long = "user", help = "Edit another member (admin only)")]
    pub user_id: Option<i64>,
}

#[derive(Args, Default)]
pub struct ExpertiseFields {
    #[arg(long)]
    pub offering: Option<String>,
    #[arg(long)]
    pub benefit: Option<String>,
    #[arg(long)]
    pub why: Option<String>,
    #[arg(long)]
    pub not_offered: Option<String>,
}

#[derive(Subcommand)]
pub enum ExpertiseCommands {
    #[command(about = "Add an expertise record (at most three)")]
    Add {
        #[command(flatten)]
        fields: ExpertiseFields,
    },
    #[command(about = "Update the record at a 1-based position")]
    Update {
        position: usize,
        #[command(flatten)]
        fields: ExpertiseFields,
    },
    #[command(about = "Remove the record at a 1-based position")]
    Remove {
        position: usize,
        #[arg(long, help = "Do not ask for confirmation")]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    #[command(about = "Show the profile and which tabs are available")]
    Show {
        #[command(flatten)]
        target: TargetArgs,
    },

    #[command(about = "Edit member details; unspecified fields keep their value")]
    Member {
        #[command(flatten)]
        target: TargetArgs,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, help = "US phone number; empty string clears it")]
        phone: Option<String>,
        #[arg(long)]
        member_id: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        local_group: Option<i64>,
        #[arg(long, help = "New password (asks for confirmation)")]
        new_password: Option<String>,
        #[arg(long)]
        confirm_password: Option<String>,
        #[arg(long, help = "Admin only")]
        role: Option<Role>,
        #[arg(long, help = "Admin only")]
        status: Option<UserStatus>,
    },

    #[command(about = "Edit the expert profile")]
    Expert {
        #[command(flatten)]
        target: TargetArgs,
        #[arg(long)]
        occupation: Option<String>,
        #[arg(long)]
        industry: Option<i64>,
        #[arg(long)]
        background: Option<String>,
        #[arg(long)]
        availability: Option<Availability>,
        #[arg(long)]
        show_contact_info: Option<bool>,
    },

    #[command(about = "Manage expertise records")]
    Expertise {
        #[command(flatten)]
        target: TargetArgs,
        #[command(subcommand)]
        cmd: ExpertiseCommands,
    },

    #[command(about = "Upload a profile photo (jpeg, png or gif, under 5MB)")]
    Photo {
        #[command(flatten)]
        target: TargetArgs,
        path: PathBuf,
    },
}

impl ProfileCommands {
    fn target(&self) -> TargetArgs {
        match self {
            ProfileCommands::Show { target }
            | ProfileCommands::Member { target, .. }
            | ProfileCommands::Expert { target, .. }
            | ProfileCommands::Expertise { target, .. }
            | ProfileCommands::Photo { target, .. } => *target,
        }
    }
}

async fn open_editor(ctx: &CliContext, target: TargetArgs) -> anyhow::Result<ProfileEditor> {
    let (route, target) = match target.user_id {
        Some(id) => (Route::User(id), ProfileTarget::Member(id)),
        None => (Route::Profile, ProfileTarget::Me),
    };
    ctx.enter(route.clone()).await?;
    if route.requires_admin() && !ctx.session().user().await.map(|u| u.is_admin()).unwrap_or(false) {
        return Err(anyhow::anyhow!(ADMIN_REQUIRED));
    }
    Ok(ProfileEditor::load(&ctx.client, target).await?)
}

pub async fn handle(cmd: ProfileCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = CliContext::connect().await?;
    let mut editor = open_editor(&ctx, cmd.target()).await.map_err(|e| match e.downcast::<crate::error::ApiError>() {
        Ok(api) => report(&ctx, &output_format, api),
        Err(other) => other,
    })?;

    match cmd {
        ProfileCommands::Show { .. } => show(&editor, &output_format),
        ProfileCommands::Member {
            first_name,
            last_name,
            email,
            phone,
            member_id,
            city,
            state,
            local_group,
            new_password,
            confirm_password,
            role,
            status,
            ..
        } => {
            let form = &mut editor.member;
            if let Some(v) = first_name {
                form.first_name = v;
            }
            if let Some(v) = last_name {
                form.last_name = v;
            }
            if let Some(v) = email {
                form.email = v;
            }
            if let Some(v) = phone {
                form.set_phone(&v);
            }
            if let Some(v) = member_id {
                form.member_id = v;
            }
            if let Some(v) = city {
                form.city = v;
            }
            if let Some(v) = state {
                form.state = v;
            }
            if local_group.is_some() {
                form.local_group = local_group;
            }
            if let Some(password) = new_password {
                form.confirm_password = match confirm_password {
                    Some(confirm) => confirm,
                    None => prompt_line("Confirm new password: ")?,
                };
                form.new_password = password;
            }
            if form.role.is_some() {
                form.role = role.or(form.role);
                form.status = status.or(form.status);
            } else if role.is_some() || status.is_some() {
                return Err(anyhow::anyhow!("--role and --status are only available with --user (admin)"));
            }

            match editor.save_member(&ctx.client).await {
                Ok(()) => output_success(&output_format, PROFILE_SAVED, Some(json!({ "user": editor.user() }))),
                Err(e) => Err(report(&ctx, &output_format, e)),
            }
        }
        ProfileCommands::Expert { occupation, industry, background, availability, show_contact_info, .. } => {
            let name = editor.user().full_name();
            let Some(form) = editor.expert.as_mut() else {
                return Err(anyhow::anyhow!("{} is not an expert", name));
            };
            if let Some(v) = occupation {
                form.occupation = v;
            }
            if industry.is_some() {
                form.industry = industry;
            }
            if let Some(v) = background {
                form.background = v;
            }
            if let Some(v) = availability {
                form.availability_status = v;
            }
            if let Some(v) = show_contact_info {
                form.show_contact_info = v;
            }
            editor.save_expert(&ctx.client).await.map_err(|e| report(&ctx, &output_format, e))?;
            output_success(&output_format, EXPERT_SAVED, Some(json!({ "expert": editor.expert_record() })))
        }
        ProfileCommands::Expertise { cmd, .. } => {
            let name = editor.user().full_name();
            let Some(expertise) = editor.expertise.as_mut() else {
                return Err(anyhow::anyhow!("{} is not an expert", name));
            };
            match cmd {
                ExpertiseCommands::Add { fields } => {
                    // A lone blank record is the tab's placeholder; fill it instead of appending
                    let index = if expertise.len() == 1 && expertise.records()[0].id.is_none() {
                        0
                    } else if expertise.add_blank() {
                        expertise.len() - 1
                    } else {
                        return Err(anyhow::anyhow!("Maximum of 3 expertise records reached"));
                    };
                    apply_fields(expertise.record_mut(index), fields);
                    let saved = expertise.save(index, &ctx.client).await.map_err(|e| report(&ctx, &output_format, e))?;
                    output_success(&output_format, "Expertise added", Some(json!({ "expertise": saved })))
                }
                ExpertiseCommands::Update { position, fields } => {
                    let index = position.checked_sub(1).ok_or_else(|| anyhow::anyhow!("Positions start at 1"))?;
                    apply_fields(expertise.record_mut(index), fields);
                    let saved = expertise.save(index, &ctx.client).await.map_err(|e| report(&ctx, &output_format, e))?;
                    output_success(&output_format, "Expertise updated", Some(json!({ "expertise": saved })))
                }
                ExpertiseCommands::Remove { position, yes } => {
                    let index = position.checked_sub(1).ok_or_else(|| anyhow::anyhow!("Positions start at 1"))?;
                    if !expertise.can_remove() {
                        return Err(anyhow::anyhow!("At least one expertise record must remain"));
                    }
                    let removed = expertise
                        .remove(index, &StdinConfirm { assume_yes: yes }, &ctx.client)
                        .await
                        .map_err(|e| report(&ctx, &output_format, e))?;
                    if removed {
                        output_success(&output_format, "Expertise removed", None)
                    } else {
                        output_success(&output_format, "Nothing removed", None)
                    }
                }
            }
        }
        ProfileCommands::Photo { path, .. } => {
            editor.upload_photo_file(&ctx.client, &path).await.map_err(|e| report(&ctx, &output_format, e))?;
            output_success(&output_format, PHOTO_SAVED, Some(json!({ "profile_photo": editor.user().profile_photo })))
        }
    }
}

fn apply_fields(record: Option<&mut crate::models::ExpertiseDraft>, fields: ExpertiseFields) {
    let Some(record) = record else { return };
    if let Some(v) = fields.offering {
        record.what_offering = v;
    }
    if let Some(v) = fields.benefit {
        record.who_would_benefit = v;
    }
    if let Some(v) = fields.why {
        record.why_choose_you = v;
    }
    if let Some(v) = fields.not_offered {
        record.skills_not_offered = v;
    }
}

fn show(editor: &ProfileEditor, output_format: &OutputFormat) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => print_json(&json!({
            "user": editor.user(),
            "tabs": editor.visible_tabs(),
            "expert": editor.expert_record(),
            "expertise": editor.expertise.as_ref().map(|e| e.records()),
            "at_capacity": editor.expertise.as_ref().map(|e| e.at_capacity()),
            "expert_error": editor.expert_error,
        })),
        OutputFormat::Text => {
            let user = editor.user();
            println!("{} <{}>", user.full_name(), user.email);
            println!("Phone: {}", if editor.member.phone().is_empty() { "-" } else { editor.member.phone() });
            println!("Member ID: {}", or_dash(user.member_id.as_deref()));
            println!("Location: {}, {}", or_dash(user.city.as_deref()), or_dash(user.state.as_deref()));
            println!("Local group: {}", or_dash(user.local_group_name.as_deref()));
            println!("Status: {}", user.status);
            if let Some(message) = &editor.expert_error {
                println!();
                println!("{}", message);
            }
            if let Some(expert) = editor.expert_record() {
                println!();
                println!("Occupation: {}", or_dash(Some(expert.occupation.as_str())));
                println!("Industry: {}", or_dash(expert.industry_name.as_deref()));
                println!("Availability: {}", expert.availability_status);
                println!("Show contact info: {}", if expert.show_contact_info { "yes" } else { "no" });
            }
            if let Some(expertise) = &editor.expertise {
                println!();
                for (i, record) in expertise.records().iter().enumerate() {
                    println!("{}. {}", i + 1, if record.is_blank() { "(blank)" } else { record.what_offering.as_str() });
                }
                if expertise.at_capacity() {
                    println!("Maximum of 3 expertise records reached");
                }
            }
            Ok(())
        }
    }
}
