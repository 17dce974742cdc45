use clap::{Parser, Subcommand};

use cadence_core::commands;
use cadence_core::{Arity, ArrayRef, Code, EngineConfig, Instruction, Value, Vm};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Cadence script engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the built-in demonstration script
    Demo,
    /// List the registered commands
    Commands {
        /// Emit the listing as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo => run_demo()?,
        Commands::Commands { json } => list_commands(json)?,
    }

    Ok(())
}

/// Build and run a small script thread: greet, sum an array with a foreach
/// loop, report the total.
fn run_demo() -> anyhow::Result<()> {
    let config = EngineConfig::load()?;

    let greetings = ArrayRef::from_values(vec![
        Value::from("hello"),
        Value::from("from"),
        Value::from("cadence"),
    ]);
    let numbers = ArrayRef::from_values(vec![
        Value::from(1.0),
        Value::from(2.0),
        Value::from(3.0),
        Value::from(4.0),
    ]);

    let greet_body = Code::new(
        "emit _x",
        vec![
            Instruction::load("_x"),
            Instruction::call("emit", Arity::Unary),
            Instruction::ClearStack,
        ],
    );
    let sum_body = Code::new(
        "total = total plus _x",
        vec![
            Instruction::load("total"),
            Instruction::load("_x"),
            Instruction::call("plus", Arity::Binary),
            Instruction::store("total"),
        ],
    );
    let program = Code::new(
        "demo",
        vec![
            Instruction::push(Value::Array(greetings)),
            Instruction::push(Value::Code(greet_body)),
            Instruction::Iterate,
            Instruction::push(0.0),
            Instruction::store("total"),
            Instruction::push(Value::Array(numbers)),
            Instruction::push(Value::Code(sum_body)),
            Instruction::Iterate,
            Instruction::load("total"),
            Instruction::call("str", Arity::Unary),
            Instruction::call("emit", Arity::Unary),
            Instruction::ClearStack,
            Instruction::load("total"),
            Instruction::Return,
        ],
    );

    let mut vm = Vm::with_config(config, commands::global());
    let thread = vm.spawn(program);
    vm.run_until_done();

    for line in &vm.out {
        println!("{line}");
    }
    if let Some(thread) = vm.thread(thread) {
        if let Some(error) = &thread.error {
            anyhow::bail!("demo thread failed: {error}");
        }
        if let Some(result) = &thread.result {
            println!("result: {result}");
        }
    }

    Ok(())
}

fn list_commands(json: bool) -> anyhow::Result<()> {
    let registry = commands::global();
    let signatures = registry.signatures();
    if json {
        println!("{}", serde_json::to_string_pretty(&signatures)?);
    } else {
        for info in signatures {
            println!("{:<32} -> {:<8} {}", info.signature, info.result, info.description);
        }
    }
    Ok(())
}
