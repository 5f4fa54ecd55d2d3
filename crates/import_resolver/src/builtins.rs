/// Module names provided by the Node runtime itself. These short-circuit
/// resolution: they are never looked up on disk, and a missing or broken
/// tsconfig must not prevent them from resolving.
pub static NODE_BUILTINS: &[&str] = &[
    "assert",
    "assert/strict",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "dns/promises",
    "domain",
    "events",
    "fs",
    "fs/promises",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "path/posix",
    "path/win32",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "readline/promises",
    "repl",
    "stream",
    "stream/consumers",
    "stream/promises",
    "stream/web",
    "string_decoder",
    "sys",
    "timers",
    "timers/promises",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "util/types",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// Membership check over [`NODE_BUILTINS`], also accepting the `node:`
/// scheme prefix. Pure, no I/O, never errors.
pub fn is_builtin(specifier: &str) -> bool {
    let name = specifier.strip_prefix("node:").unwrap_or(specifier);
    NODE_BUILTINS.contains(&name)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_core_modules() {
        assert!(is_builtin("fs"));
        assert!(is_builtin("path"));
        assert!(is_builtin("fs/promises"));
    }

    #[test]
    fn test_node_prefix() {
        assert!(is_builtin("node:fs"));
        assert!(is_builtin("node:timers/promises"));
    }

    #[test]
    fn test_non_builtins() {
        assert!(!is_builtin("react"));
        assert!(!is_builtin("./fs"));
        assert!(!is_builtin("fs/extra"));
        assert!(!is_builtin(""));
    }
}
