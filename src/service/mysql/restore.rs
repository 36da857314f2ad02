use std::fs::File;
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use log::info;
use tokio::process::Command;

use crate::error::Result;
use crate::service::command::run_redirected;
use crate::service::mysql::MySqlTools;
use crate::tools::MYSQL;

pub fn restore_args(user: &str, password: &str, database: &str) -> Vec<String> {
    let mut args = vec!["-u".to_string(), user.to_string()];
    if !password.is_empty() {
        args.push(format!("-p{password}"));
    }
    args.push(database.to_string());
    args
}

pub fn create_command(tool: &Path, args: &[String], sql_file: File) -> Command {
    let mut cmd = Command::new(tool);
    cmd.args(args);
    cmd.stdin(Stdio::from(sql_file));
    cmd
}

#[async_trait]
pub trait RestoreRunner {
    async fn restore_from_file(
        &self,
        user: &str,
        password: &str,
        database: &str,
        sql_path: &Path,
    ) -> Result<()>;
}

#[async_trait]
impl RestoreRunner for MySqlTools {
    async fn restore_from_file(
        &self,
        user: &str,
        password: &str,
        database: &str,
        sql_path: &Path,
    ) -> Result<()> {
        let tool = self.locator().locate_staged(MYSQL)?;
        info!("restoring {database} from {}", sql_path.display());

        let sql_file = File::open(sql_path)?;
        let args = restore_args(user, password, database);
        let cmd = create_command(&tool, &args, sql_file);
        run_redirected(cmd, self.timeout()).await?;

        info!("-> restored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_names_only_the_database() {
        let args = restore_args("admin", "pw", "shop");
        assert_eq!(args, vec!["-u", "admin", "-ppw", "shop"]);
    }

    #[test]
    fn empty_password_is_left_out() {
        let args = restore_args("admin", "", "shop");
        assert_eq!(args, vec!["-u", "admin", "shop"]);
    }
}
