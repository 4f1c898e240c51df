use clap::{Parser, Subcommand};
use clinic_core::auth::password::BCRYPT_COST;

#[derive(Parser, Debug)]
#[command(name = "clinic_cli", version, about = "Clinic records admin tool")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the CLI version
    Version,

    /// Print a bcrypt hash for a password
    HashPassword {
        password: String,

        /// bcrypt cost (at least 10)
        #[arg(long, default_value_t = BCRYPT_COST)]
        cost: u32,
    },

    /// Apply pending database migrations
    Migrate {
        #[arg(long, env = "DATABASE_URL")]
        database_url: String,
    },

    /// Migrate, then load the standard catalog and an optional admin account
    Seed {
        #[arg(long, env = "DATABASE_URL")]
        database_url: String,

        #[arg(long, env = "ADMIN_EMAIL", requires = "admin_password")]
        admin_email: Option<String>,

        #[arg(
            long,
            env = "ADMIN_PASSWORD",
            requires = "admin_email",
            hide_env_values = true
        )]
        admin_password: Option<String>,

        /// bcrypt cost for the admin password
        #[arg(long, env = "BCRYPT_COST", default_value_t = BCRYPT_COST)]
        cost: u32,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn admin_email_needs_password() {
        let res = Cli::try_parse_from([
            "clinic_cli",
            "seed",
            "--database-url",
            "postgres://localhost/clinic",
            "--admin-email",
            "root@clinic.test",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn hash_password_defaults_cost() {
        let cli = Cli::try_parse_from(["clinic_cli", "hash-password", "hunter22"]).unwrap();
        match cli.command {
            Commands::HashPassword { password, cost } => {
                assert_eq!(password, "hunter22");
                assert_eq!(cost, 10);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
