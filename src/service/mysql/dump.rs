use std::fs::File;
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use log::info;
use tokio::process::Command;

use crate::error::Result;
use crate::service::command::run_redirected;
use crate::service::mysql::MySqlTools;
use crate::tools::MYSQLDUMP;

// Everything is passed as its own argument. Database and table names never
// go through a shell, so nothing in them can be interpreted.
pub fn dump_args(user: &str, password: &str, database: &str, tables: &[String]) -> Vec<String> {
    let mut args = vec!["-u".to_string(), user.to_string()];
    if !password.is_empty() {
        args.push(format!("-p{password}"));
    }
    args.push(database.to_string());
    args.extend(tables.iter().cloned());
    args
}

pub fn create_command(tool: &Path, args: &[String], out_file: File) -> Command {
    let mut cmd = Command::new(tool);
    cmd.args(args);
    cmd.stdout(Stdio::from(out_file));
    cmd
}

#[async_trait]
pub trait DumpRunner {
    async fn dump_to_file(
        &self,
        user: &str,
        password: &str,
        database: &str,
        tables: &[String],
        out_path: &Path,
    ) -> Result<()>;
}

#[async_trait]
impl DumpRunner for MySqlTools {
    async fn dump_to_file(
        &self,
        user: &str,
        password: &str,
        database: &str,
        tables: &[String],
        out_path: &Path,
    ) -> Result<()> {
        let tool = self.locator().locate_staged(MYSQLDUMP)?;
        info!("dumping {database} into {}", out_path.display());

        let out_file = File::create(out_path)?;
        let args = dump_args(user, password, database, tables);
        let cmd = create_command(&tool, &args, out_file);
        run_redirected(cmd, self.timeout()).await?;

        info!("-> dumped");
        Ok(())
    }
}
