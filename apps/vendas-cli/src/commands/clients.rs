//! Client commands over `/clientes/`.

use tracing::info;

use vendas_client::{CatalogService, ClientDirectory};
use vendas_core::{Client, ClientInput};

use super::{or_dash, Context};
use crate::cli::ClientsCommand;

pub async fn run(cmd: ClientsCommand, ctx: &Context) -> anyhow::Result<()> {
    match cmd {
        ClientsCommand::List => {
            let clients = ctx.api.list_clients().await?;
            ctx.emit(&clients, |clients| print_table(clients))
        }
        ClientsCommand::Show { id } => {
            let client = ctx.api.get_client(id).await?;
            ctx.emit(&client, |c| {
                println!("Client {}", c.id);
                println!("  name:  {}", c.name);
                println!("  email: {}", or_dash(c.email.as_deref()));
                println!("  phone: {}", or_dash(c.phone.as_deref()));
            })
        }
        ClientsCommand::Add { name, email, phone } => {
            let input = ClientInput { name, email, phone };
            let client = ctx.api.create_client(&input).await?;
            info!(client_id = client.id, "Client registered");
            ctx.emit(&client, |c| println!("Registered client {} ({})", c.id, c.name))
        }
    }
}

fn print_table(clients: &[Client]) {
    if clients.is_empty() {
        println!("No clients registered.");
        return;
    }
    println!("{:>5}  {:<30}  {:<30}  {:<15}", "ID", "NAME", "EMAIL", "PHONE");
    for c in clients {
        println!(
            "{:>5}  {:<30}  {:<30}  {:<15}",
            c.id,
            c.name,
            or_dash(c.email.as_deref()),
            or_dash(c.phone.as_deref())
        );
    }
}
