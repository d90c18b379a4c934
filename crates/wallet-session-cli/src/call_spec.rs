/*
[INPUT]:  `--call` argument text
[OUTPUT]: Contract call for the execute command
[POS]:    CLI argument parsing
[UPDATE]: When the call argument format changes
*/

use wallet_session_adapter::Call;

/// Parse `contract:entrypoint[:arg,arg,...]` into a `Call`
pub fn parse_call(value: &str) -> Result<Call, String> {
    let mut parts = value.splitn(3, ':');
    let contract = parts.next().unwrap_or_default().trim();
    let entry_point = parts.next().map(str::trim).unwrap_or_default();

    if contract.is_empty() {
        return Err("missing contract address".to_string());
    }
    if entry_point.is_empty() {
        return Err("missing entry point (expected contract:entrypoint[:args])".to_string());
    }

    let calldata = match parts.next() {
        Some(args) if !args.trim().is_empty() => {
            args.split(',').map(|arg| arg.trim().to_string()).collect()
        }
        _ => Vec::new(),
    };

    Ok(Call::new(contract, entry_point, calldata))
}
