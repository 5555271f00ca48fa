use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "cwtail")]
#[command(about = "Tail an AWS CloudWatch log group in the terminal", long_about = None)]
pub struct Cli {
    /// CloudWatch log group to tail, e.g. /aws/lambda/some-function
    pub log_group: String,

    /// How far back to replay history, e.g. 1m, 2h, 5d (default from
    /// config, normally 5m)
    pub window: Option<String>,

    /// AWS region override
    #[arg(long)]
    pub region: Option<String>,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}
