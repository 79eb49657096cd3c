//! Human-readable output formatting

use crate::engine::executor::{ExecutionResult, ResultData};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn format_human(result: &ExecutionResult) -> String {
    let mut output = match &result.data {
        ResultData::Users(users) => {
            if users.is_empty() {
                return "No users found".to_string();
            }
            let mut output = String::from("Users\n-----\n");
            output.push_str(&format!(
                "{:<24} {:>9} {:>9}  {:<16}\n",
                "USERNAME", "SUPERUSER", "PASSWORD", "CREATED"
            ));
            output.push_str(&"-".repeat(61));
            output.push('\n');
            for user in users {
                output.push_str(&format!(
                    "{:<24} {:>9} {:>9}  {:<16}\n",
                    truncate(&user.username, 24),
                    yes_no(user.is_superuser),
                    yes_no(user.password_set),
                    user.created.format(TIME_FORMAT).to_string()
                ));
            }
            output
        }
        ResultData::Groups(groups) => {
            if groups.is_empty() {
                return "No groups found".to_string();
            }
            let mut output = String::from("Groups\n------\n");
            output.push_str(&format!("{:<24} {:>7}  {}\n", "NAME", "MEMBERS", "USERS"));
            output.push_str(&"-".repeat(50));
            output.push('\n');
            for group in groups {
                let members: Vec<&str> = group.members.iter().map(String::as_str).collect();
                output.push_str(&format!(
                    "{:<24} {:>7}  {}\n",
                    truncate(&group.name, 24),
                    group.members.len(),
                    if members.is_empty() {
                        "-".to_string()
                    } else {
                        members.join(", ")
                    }
                ));
            }
            output
        }
        ResultData::Script(info) => {
            let mut output = format!("Script: {}\nLines: {}\n\n", info.path, info.lines.len());
            for line in &info.lines {
                output.push_str(line);
                output.push('\n');
            }
            output
        }
        ResultData::Scripts(names) => {
            if names.is_empty() {
                return "No scripts found".to_string();
            }
            let mut output = String::from("Scripts\n-------\n");
            for name in names {
                output.push_str(&format!("  {}\n", name));
            }
            output
        }
        ResultData::Message(msg) => msg.clone(),
        ResultData::Empty => String::new(),
    };

    if let Some(message) = &result.message {
        if !output.ends_with('\n') {
            output.push('\n');
        }
        output.push('\n');
        output.push_str(message);
    }
    output.trim_end().to_string()
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len - 3).collect();
        format!("{}...", cut)
    }
}
