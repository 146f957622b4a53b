use radius_client::RadiusClient;
use radius_proto::{Code, MemoryDictionary};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 4 {
        eprintln!("Usage: {} <username> <password> <secret> [server_ip]", args[0]);
        eprintln!("Example: {} admin admin123 testing123 127.0.0.1", args[0]);
        std::process::exit(1);
    }

    let username = &args[1];
    let password = &args[2];
    let secret = &args[3];
    let server = args.get(4).map(|s| s.as_str()).unwrap_or("127.0.0.1");

    println!("RADIUS Client Test");
    println!("==================");
    println!("Server: {}", server);
    println!("Username: {}", username);
    println!();

    let client = RadiusClient::new(server, secret, MemoryDictionary::standard().into_shared())?;

    let mut request = client.new_request(Code::AccessRequest);
    request.add_attribute_str("User-Name", username)?;
    request.add_attribute_str("User-Password", password)?;
    request.add_attribute_str("NAS-IP-Address", "0x7f000001")?;

    let response = match client.authenticate(&mut request).await {
        Ok(response) => response,
        Err(e) => {
            eprintln!("\n✗ No valid response from server: {}", e);
            eprintln!("  Make sure the RADIUS server is running on {}:{}", server, client.auth_port());
            return Err(e.into());
        }
    };

    match response.code {
        Code::AccessAccept => println!("\n✓ Authentication SUCCESSFUL!"),
        Code::AccessReject => println!("\n✗ Authentication FAILED!"),
        Code::AccessChallenge => println!("\n→ Authentication CHALLENGE!"),
        other => println!("\n? Unexpected response: {}", other),
    }

    println!("\nResponse Details:");
    println!("{}", response);

    // Accounting Start for the same session
    let mut accounting = client.new_request(Code::AccountingRequest);
    accounting.add_attribute_str("User-Name", username)?;
    accounting.add_attribute_str("Acct-Status-Type", "Start")?;
    accounting.add_attribute_str("Acct-Session-Id", "simple-client-0001")?;
    match client.account(&mut accounting).await {
        Ok(answer) => println!("\nAccounting: {}", answer.code),
        Err(e) => eprintln!("\nAccounting failed: {}", e),
    }

    Ok(())
}
