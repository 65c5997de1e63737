use anyhow::Result;
use comfy_table::{Cell, Table};
use nixt_core::AppCore;
use nixt_core::api::{PageParams, Project, ProjectQuery};

use crate::cli::ProjectCommands;
use crate::output::{OutputFormat, json::print_json, table::print_table};

pub async fn run(core: &AppCore, command: ProjectCommands, format: OutputFormat) -> Result<()> {
    match command {
        ProjectCommands::List {
            limit,
            offset,
            order,
            search,
            status,
            priority,
            user,
            team_member,
        } => {
            let page = PageParams {
                limit,
                offset,
                order,
            };
            let projects = match team_member {
                Some(admin_id) => core.api.list_projects_by_team_member(&admin_id, &page).await?,
                None => {
                    let query = ProjectQuery {
                        page,
                        search,
                        status: status.map(Into::into),
                        priority: priority.map(Into::into),
                        user_id: user,
                    };
                    core.api.list_projects(&query).await?
                }
            };

            if format.is_json() {
                return print_json(&projects);
            }
            if projects.data.is_empty() {
                println!("No projects found.");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_header(vec![
                "ID", "Name", "Status", "Priority", "Done", "Price", "Spent", "Deadline",
            ]);
            for project in &projects.data {
                table.add_row(vec![
                    Cell::new(&project.id),
                    Cell::new(&project.name),
                    Cell::new(project.status.to_string()),
                    Cell::new(project.priority.to_string()),
                    Cell::new(format!("{:.0}%", project.completion())),
                    Cell::new(format!("{:.2}", project.price)),
                    Cell::new(format!("{:.2}", project.spent)),
                    Cell::new(&project.deadline),
                ]);
            }
            print_table(table)?;
            if projects.has_more() {
                println!("{} more, next offset {}", projects.left, projects.next_offset);
            }
            Ok(())
        }
        ProjectCommands::Show { id } => {
            let project = core.api.get_project(&id).await?;
            if format.is_json() {
                return print_json(&project);
            }
            print_project(&project);
            Ok(())
        }
        ProjectCommands::Stats => {
            let stats = core.api.project_statistics().await?;
            if format.is_json() {
                return print_json(&stats);
            }
            println!("Total:      {}", stats.total);
            println!("Active:     {}", stats.by_status.active);
            println!("Pending:    {}", stats.by_status.pending);
            println!("Completed:  {}", stats.by_status.completed);
            println!("On hold:    {}", stats.by_status.onhold);
            Ok(())
        }
        ProjectCommands::Delete { id } => {
            let result = core.api.delete_project(&id).await?;
            if format.is_json() {
                return print_json(&result);
            }
            println!("Deleted project {} ({} row(s))", id, result.changed_rows());
            Ok(())
        }
    }
}

fn print_project(project: &Project) {
    println!("ID:         {}", project.id);
    println!("Name:       {}", project.name);
    println!("Owner:      {}", project.user_id);
    println!("Status:     {}", project.status);
    println!("Priority:   {}", project.priority);
    println!("Price:      {:.2}", project.price);
    println!("Spent:      {:.2}", project.spent);
    println!("Deadline:   {}", project.deadline);
    println!(
        "Team:       {}",
        if project.team.is_empty() {
            "-".to_string()
        } else {
            project.team.join(", ")
        }
    );
    println!("Progress:   {:.0}% complete", project.completion());
    for item in &project.progress {
        let mark = if project.progress_completed.contains(&item.id) {
            "x"
        } else {
            " "
        };
        println!("  [{}] {} ({}%)", mark, item.title, item.percent);
    }
}
