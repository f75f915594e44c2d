//! Tool catalog — static definitions of every security tool the server exposes
//!
//! Each entry names the HTTP endpoint (`/api/tools/<name>`), the function name
//! agents call it by, and the parameters it accepts. The tool server renders
//! command lines from these parameters; the bridge derives argument schemas
//! from them.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    NetworkScanning,
    WebScanning,
    PasswordCracking,
    Exploitation,
    Wireless,
    WindowsAd,
    InformationGathering,
    Shells,
    VulnerabilityScanning,
    Database,
    Forensics,
    Anonymity,
    Mobile,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::NetworkScanning => "network_scanning",
            Category::WebScanning => "web_scanning",
            Category::PasswordCracking => "password_cracking",
            Category::Exploitation => "exploitation",
            Category::Wireless => "wireless",
            Category::WindowsAd => "windows_ad",
            Category::InformationGathering => "information_gathering",
            Category::Shells => "shells",
            Category::VulnerabilityScanning => "vulnerability_scanning",
            Category::Database => "database",
            Category::Forensics => "forensics",
            Category::Anonymity => "anonymity",
            Category::Mobile => "mobile",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    String,
    Boolean,
    /// Free-form key/value map (metasploit module options)
    Object,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    /// Default in textual form; booleans use "true"/"false"
    pub default: Option<&'static str>,
    pub description: &'static str,
}

impl ParamSpec {
    /// Default as a JSON value of the parameter's kind
    pub fn default_value(&self) -> Option<Value> {
        let raw = self.default?;
        Some(match self.kind {
            ParamKind::Boolean => Value::Bool(raw == "true"),
            ParamKind::String => Value::String(raw.to_string()),
            ParamKind::Object => Value::Object(serde_json::Map::new()),
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ToolSpec {
    /// Endpoint name under `/api/tools/`
    pub name: &'static str,
    /// Name agents invoke the tool by
    pub function: &'static str,
    pub category: Category,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
}

impl ToolSpec {
    pub fn param(&self, name: &str) -> Option<&'static ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn required_params(&self) -> impl Iterator<Item = &'static ParamSpec> {
        self.params.iter().filter(|p| p.required)
    }

    /// Path of the tool's endpoint relative to the server root
    pub fn endpoint(&self) -> String {
        format!("api/tools/{}", self.name)
    }
}

const fn required(name: &'static str, description: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamKind::String,
        required: true,
        default: None,
        description,
    }
}

const fn optional(name: &'static str, description: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamKind::String,
        required: false,
        default: None,
        description,
    }
}

const fn defaulted(
    name: &'static str,
    default: &'static str,
    description: &'static str,
) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamKind::String,
        required: false,
        default: Some(default),
        description,
    }
}

const fn flag(name: &'static str, default: bool, description: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamKind::Boolean,
        required: false,
        default: Some(if default { "true" } else { "false" }),
        description,
    }
}

const fn object(name: &'static str, description: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamKind::Object,
        required: false,
        default: Some("{}"),
        description,
    }
}

const ADDITIONAL_ARGS: ParamSpec = optional("additional_args", "Additional command-line arguments");
const DIRB_WORDLIST: &str = "/usr/share/wordlists/dirb/common.txt";
const ROCKYOU: &str = "/usr/share/wordlists/rockyou.txt";

macro_rules! tool {
    ($name:literal, $function:literal, $category:ident, $description:literal, [$($param:expr),* $(,)?]) => {
        ToolSpec {
            name: $name,
            function: $function,
            category: Category::$category,
            description: $description,
            params: &[$($param),*],
        }
    };
}

/// Every tool the server knows how to run
pub static TOOLS: &[ToolSpec] = &[
    // Network scanning
    tool!("nmap", "nmap_scan", NetworkScanning, "Execute an Nmap scan against a target", [
        required("target", "IP address, CIDR range or hostname to scan"),
        defaulted("scan_type", "-sCV", "Scan type flags"),
        optional("ports", "Comma-separated ports or port ranges"),
        defaulted("additional_args", "-T4 -Pn", "Additional Nmap arguments"),
    ]),
    tool!("masscan", "masscan_scan", NetworkScanning, "Execute a Masscan port scan against a target", [
        required("target", "IP address, CIDR range or hostname to scan"),
        defaulted("ports", "0-65535", "Port range to scan"),
        defaulted("rate", "1000", "Packets per second"),
        ADDITIONAL_ARGS,
    ]),
    tool!("netdiscover", "netdiscover_scan", NetworkScanning, "Discover live hosts with ARP requests", [
        optional("range", "Network range to scan, e.g. 192.168.1.0/24"),
        optional("interface", "Network interface"),
        flag("passive_mode", false, "Only sniff, do not send packets"),
        ADDITIONAL_ARGS,
    ]),
    tool!("hping3", "hping3_scan", NetworkScanning, "Craft and send packets with hping3", [
        required("target", "Target host"),
        defaulted("mode", "syn", "Packet mode: syn, udp, icmp or raw"),
        defaulted("port", "80", "Destination port"),
        defaulted("count", "3", "Number of packets"),
        ADDITIONAL_ARGS,
    ]),
    tool!("unicornscan", "unicornscan_scan", NetworkScanning, "Asynchronous port scan with Unicornscan", [
        required("target", "Target host or range"),
        defaulted("mode", "tcp", "Scan mode: tcp or udp"),
        defaulted("ports", "1-65535", "Port range"),
        ADDITIONAL_ARGS,
    ]),
    tool!("arping", "arping_scan", NetworkScanning, "Probe a host with ARP requests", [
        required("target", "Target host"),
        optional("interface", "Network interface"),
        defaulted("count", "4", "Number of requests"),
        ADDITIONAL_ARGS,
    ]),
    tool!("tcpdump", "tcpdump_capture", NetworkScanning, "Capture packets with tcpdump", [
        defaulted("interface", "eth0", "Interface to capture on"),
        optional("filter_expr", "BPF filter expression"),
        defaulted("count", "100", "Number of packets to capture"),
        optional("output_file", "Write packets to this pcap file"),
        ADDITIONAL_ARGS,
    ]),
    tool!("tshark", "tshark_capture", NetworkScanning, "Capture or read packets with tshark", [
        defaulted("interface", "eth0", "Interface to capture on"),
        optional("filter_expr", "Display filter expression"),
        defaulted("count", "100", "Number of packets to capture"),
        optional("read_file", "Read packets from this pcap file instead of capturing"),
        ADDITIONAL_ARGS,
    ]),
    // Web application scanning
    tool!("gobuster", "gobuster_scan", WebScanning, "Brute-force directories, DNS names or virtual hosts with Gobuster", [
        required("url", "Target URL"),
        defaulted("mode", "dir", "Scan mode: dir, dns, fuzz or vhost"),
        defaulted("wordlist", DIRB_WORDLIST, "Wordlist path"),
        ADDITIONAL_ARGS,
    ]),
    tool!("dirb", "dirb_scan", WebScanning, "Scan a web server for content with Dirb", [
        required("url", "Target URL"),
        defaulted("wordlist", DIRB_WORDLIST, "Wordlist path"),
        ADDITIONAL_ARGS,
    ]),
    tool!("nikto", "nikto_scan", WebScanning, "Scan a web server for vulnerabilities with Nikto", [
        required("target", "Target URL or host"),
        ADDITIONAL_ARGS,
    ]),
    tool!("wpscan", "wpscan_analyze", WebScanning, "Scan a WordPress site with WPScan", [
        required("url", "Target WordPress URL"),
        ADDITIONAL_ARGS,
    ]),
    tool!("sqlmap", "sqlmap_scan", WebScanning, "Test a URL for SQL injection with sqlmap", [
        required("url", "Target URL"),
        optional("data", "POST data string"),
        ADDITIONAL_ARGS,
    ]),
    tool!("zap", "zap_scan", WebScanning, "Run an OWASP ZAP scan script", [
        required("target", "Target URL"),
        defaulted("scan_type", "baseline", "Scan script: baseline, full or api"),
        ADDITIONAL_ARGS,
    ]),
    tool!("wfuzz", "wfuzz_scan", WebScanning, "Fuzz a web application with Wfuzz", [
        required("url", "Target URL containing the FUZZ keyword"),
        defaulted("wordlist", DIRB_WORDLIST, "Wordlist path"),
        defaulted("payload_position", "FUZZ", "Payload keyword"),
        ADDITIONAL_ARGS,
    ]),
    tool!("ffuf", "ffuf_scan", WebScanning, "Fuzz a web application with ffuf", [
        required("url", "Target URL containing the FUZZ keyword"),
        defaulted("wordlist", DIRB_WORDLIST, "Wordlist path"),
        defaulted("mode", "dir", "Fuzzing mode"),
        ADDITIONAL_ARGS,
    ]),
    tool!("whatweb", "whatweb_scan", WebScanning, "Fingerprint web technologies with WhatWeb", [
        required("target", "Target URL or host"),
        defaulted("aggression", "1", "Aggression level 1-4"),
        ADDITIONAL_ARGS,
    ]),
    tool!("sublist3r", "sublist3r_scan", WebScanning, "Enumerate subdomains with Sublist3r", [
        required("domain", "Target domain"),
        flag("bruteforce", false, "Enable the subbrute module"),
        optional("ports", "Ports to probe on found subdomains"),
        ADDITIONAL_ARGS,
    ]),
    tool!("amass", "amass_scan", WebScanning, "Map attack surface with OWASP Amass", [
        required("domain", "Target domain"),
        defaulted("mode", "enum", "Amass subcommand"),
        flag("passive", false, "Passive enumeration only"),
        ADDITIONAL_ARGS,
    ]),
    tool!("wapiti", "wapiti_scan", WebScanning, "Audit a web application with Wapiti", [
        required("url", "Target URL"),
        defaulted("scope", "page", "Scan scope"),
        optional("modules", "Comma-separated attack modules"),
        ADDITIONAL_ARGS,
    ]),
    tool!("commix", "commix_scan", WebScanning, "Test for command injection with Commix", [
        required("url", "Target URL"),
        optional("data", "POST data string"),
        optional("cookie", "Cookie header value"),
        ADDITIONAL_ARGS,
    ]),
    tool!("xsstrike", "xsstrike_scan", WebScanning, "Test for cross-site scripting with XSStrike", [
        required("url", "Target URL"),
        optional("data", "POST data string"),
        flag("crawl", false, "Crawl the target"),
        ADDITIONAL_ARGS,
    ]),
    tool!("skipfish", "skipfish_scan", WebScanning, "Run a Skipfish reconnaissance scan", [
        required("url", "Target URL"),
        defaulted("output_dir", "/tmp/skipfish_results", "Report output directory"),
        optional("wordlist", "Wordlist path"),
        ADDITIONAL_ARGS,
    ]),
    // Password cracking
    tool!("hydra", "hydra_attack", PasswordCracking, "Brute-force a network login with Hydra", [
        required("target", "Target host"),
        required("service", "Service to attack, e.g. ssh or ftp"),
        optional("username", "Single username"),
        optional("username_file", "Username list file"),
        optional("password", "Single password"),
        optional("password_file", "Password list file"),
        ADDITIONAL_ARGS,
    ]),
    tool!("john", "john_crack", PasswordCracking, "Crack password hashes with John the Ripper", [
        required("hash_file", "File containing hashes"),
        defaulted("wordlist", ROCKYOU, "Wordlist path"),
        optional("format", "Hash format"),
        ADDITIONAL_ARGS,
    ]),
    tool!("hashcat", "hashcat_crack", PasswordCracking, "Crack password hashes with Hashcat", [
        required("hash_file", "File containing hashes"),
        defaulted("wordlist", ROCKYOU, "Wordlist path"),
        defaulted("hash_type", "0", "Hash mode number"),
        defaulted("attack_mode", "0", "Attack mode number"),
        ADDITIONAL_ARGS,
    ]),
    tool!("medusa", "medusa_attack", PasswordCracking, "Brute-force a network login with Medusa", [
        required("target", "Target host"),
        required("service", "Service module, e.g. ssh"),
        optional("username", "Single username"),
        optional("username_file", "Username list file"),
        optional("password", "Single password"),
        optional("password_file", "Password list file"),
        ADDITIONAL_ARGS,
    ]),
    tool!("crackmapexec", "crackmapexec_scan", PasswordCracking, "Assess Windows/AD networks with CrackMapExec", [
        required("target", "Target host or range"),
        defaulted("protocol", "smb", "Protocol"),
        optional("username", "Username"),
        optional("password", "Password"),
        optional("hash", "NTLM hash"),
        ADDITIONAL_ARGS,
    ]),
    tool!("patator", "patator_attack", PasswordCracking, "Multi-purpose brute-forcing with Patator", [
        required("module", "Patator module, e.g. ssh_login"),
        required("target", "Target host"),
        optional("username_file", "Username list file"),
        optional("password_file", "Password list file"),
        ADDITIONAL_ARGS,
    ]),
    tool!("fcrackzip", "fcrackzip_crack", PasswordCracking, "Crack ZIP archive passwords with fcrackzip", [
        required("zip_file", "ZIP archive path"),
        optional("wordlist", "Wordlist path for dictionary mode"),
        flag("bruteforce", false, "Use brute-force mode"),
        defaulted("charset", "aA1", "Brute-force character set"),
        ADDITIONAL_ARGS,
    ]),
    // Exploitation
    tool!("metasploit", "metasploit_run", Exploitation, "Run a Metasploit module through a resource script", [
        required("module", "Module path, e.g. exploit/unix/ftp/vsftpd_234_backdoor"),
        object("options", "Module options as key/value pairs"),
    ]),
    tool!("searchsploit", "searchsploit_search", Exploitation, "Search Exploit-DB with searchsploit", [
        required("query", "Search terms"),
        flag("exact", false, "Exact title match"),
        flag("json_output", true, "JSON output"),
        ADDITIONAL_ARGS,
    ]),
    tool!("beef", "beef_start", Exploitation, "Start the BeEF browser exploitation framework", [
        defaulted("port", "3000", "Listening port"),
        ADDITIONAL_ARGS,
    ]),
    tool!("setoolkit", "setoolkit_run", Exploitation, "Launch the Social-Engineer Toolkit", [
        optional("attack_vector", "Attack vector"),
        optional("payload", "Payload"),
        optional("target", "Target"),
        ADDITIONAL_ARGS,
    ]),
    tool!("routersploit", "routersploit_run", Exploitation, "Run a RouterSploit module against an embedded device", [
        required("module", "Module path"),
        required("target", "Target host"),
        optional("port", "Target port"),
        optional("additional_options", "Additional module options"),
    ]),
    // Wireless
    tool!("aircrack", "aircrack_attack", Wireless, "Crack WEP/WPA keys from a capture with Aircrack-ng", [
        required("capture_file", "Capture file path"),
        defaulted("wordlist", ROCKYOU, "Wordlist path"),
        optional("bssid", "Target access point BSSID"),
        ADDITIONAL_ARGS,
    ]),
    tool!("reaver", "reaver_attack", Wireless, "Attack WPS with Reaver", [
        required("interface", "Monitor-mode interface"),
        required("bssid", "Target access point BSSID"),
        optional("channel", "Channel"),
        ADDITIONAL_ARGS,
    ]),
    tool!("bully", "bully_attack", Wireless, "Attack WPS with Bully", [
        required("interface", "Monitor-mode interface"),
        required("bssid", "Target access point BSSID"),
        optional("channel", "Channel"),
        ADDITIONAL_ARGS,
    ]),
    tool!("wifite", "wifite_attack", Wireless, "Automated wireless auditing with Wifite", [
        optional("interface", "Wireless interface"),
        optional("target_bssid", "Target access point BSSID"),
        ADDITIONAL_ARGS,
    ]),
    tool!("kismet", "kismet_scan", Wireless, "Passive wireless discovery with Kismet", [
        required("interface", "Capture interface"),
        defaulted("duration", "60", "Capture duration in seconds"),
        ADDITIONAL_ARGS,
    ]),
    // Windows / Active Directory
    tool!("enum4linux", "enum4linux_scan", WindowsAd, "Enumerate Windows/Samba hosts with enum4linux", [
        required("target", "Target host"),
        defaulted("additional_args", "-a", "Additional enum4linux arguments"),
    ]),
    tool!("responder", "responder_attack", WindowsAd, "Poison LLMNR/NBT-NS/MDNS with Responder", [
        required("interface", "Network interface"),
        flag("analyze", false, "Analyze mode only"),
        flag("wpad", true, "Start the WPAD rogue proxy"),
        ADDITIONAL_ARGS,
    ]),
    tool!("impacket", "impacket_run", WindowsAd, "Run an Impacket example script", [
        required("script", "Script name without .py, e.g. secretsdump"),
        required("target", "Target host"),
        optional("username", "Username"),
        optional("password", "Password"),
        optional("hash", "NTLM hash"),
        ADDITIONAL_ARGS,
    ]),
    tool!("evil_winrm", "evil_winrm_connect", WindowsAd, "Open a WinRM session with Evil-WinRM", [
        required("target", "Target host"),
        required("username", "Username"),
        optional("password", "Password"),
        optional("hash", "NTLM hash"),
        ADDITIONAL_ARGS,
    ]),
    tool!("kerbrute", "kerbrute_attack", WindowsAd, "Kerberos user enumeration and password spraying with Kerbrute", [
        required("domain", "Target domain"),
        required("dc_ip", "Domain controller address"),
        defaulted("mode", "userenum", "Kerbrute subcommand"),
        optional("wordlist", "User or password list"),
        ADDITIONAL_ARGS,
    ]),
    tool!("mimikatz", "mimikatz_run", WindowsAd, "Run a Mimikatz command", [
        required("command", "Mimikatz command"),
        optional("target", "Target host"),
        ADDITIONAL_ARGS,
    ]),
    // Information gathering
    tool!("theharvester", "theharvester_scan", InformationGathering, "Gather emails, names and hosts with theHarvester", [
        required("domain", "Target domain"),
        defaulted("sources", "all", "Data sources"),
        defaulted("limit", "500", "Result limit"),
        ADDITIONAL_ARGS,
    ]),
    tool!("reconng", "reconng_run", InformationGathering, "Run a Recon-ng module", [
        defaulted("workspace", "default", "Recon-ng workspace"),
        required("module", "Module path"),
        required("target", "Module SOURCE value"),
        ADDITIONAL_ARGS,
    ]),
    tool!("shodan", "shodan_search", InformationGathering, "Search Shodan from the command line", [
        required("query", "Shodan search query"),
        defaulted("limit", "100", "Result limit"),
        ADDITIONAL_ARGS,
    ]),
    tool!("spiderfoot", "spiderfoot_scan", InformationGathering, "Automated OSINT with SpiderFoot", [
        required("target", "Scan target"),
        defaulted("modules", "all", "Modules to enable"),
        ADDITIONAL_ARGS,
    ]),
    tool!("dnsenum", "dnsenum_scan", InformationGathering, "Enumerate DNS information with dnsenum", [
        required("domain", "Target domain"),
        optional("dns_server", "DNS server to query"),
        ADDITIONAL_ARGS,
    ]),
    tool!("fierce", "fierce_scan", InformationGathering, "Locate non-contiguous IP space with Fierce", [
        required("domain", "Target domain"),
        optional("dns_server", "DNS server to query"),
        ADDITIONAL_ARGS,
    ]),
    tool!("dnsrecon", "dnsrecon_scan", InformationGathering, "DNS reconnaissance with DNSRecon", [
        required("domain", "Target domain"),
        defaulted("scan_type", "std", "Enumeration type"),
        ADDITIONAL_ARGS,
    ]),
    tool!("whois", "whois_lookup", InformationGathering, "WHOIS lookup for a domain or address", [
        required("target", "Domain or IP address"),
        ADDITIONAL_ARGS,
    ]),
    tool!("metagoofil", "metagoofil_scan", InformationGathering, "Extract metadata from public documents with Metagoofil", [
        required("domain", "Target domain"),
        defaulted("file_types", "pdf,doc,xls,ppt", "Document types"),
        defaulted("limit", "100", "Result limit"),
        ADDITIONAL_ARGS,
    ]),
    // Shells and persistence
    tool!("weevely", "weevely_run", Shells, "Generate or connect to a Weevely web shell", [
        required("mode", "generate or connect"),
        optional("url", "Web shell URL (connect mode)"),
        optional("password", "Web shell password"),
        optional("output_file", "Agent output path (generate mode)"),
        ADDITIONAL_ARGS,
    ]),
    tool!("netcat", "netcat_run", Shells, "Listen on or connect to a port with netcat", [
        required("mode", "listen or connect"),
        optional("target", "Target host (connect mode)"),
        defaulted("port", "4444", "Port"),
        ADDITIONAL_ARGS,
    ]),
    tool!("socat", "socat_run", Shells, "Relay data between two addresses with socat", [
        required("source", "Source address"),
        required("destination", "Destination address"),
        ADDITIONAL_ARGS,
    ]),
    tool!("msfvenom", "msfvenom_generate", Shells, "Generate a payload with msfvenom", [
        required("payload", "Payload name"),
        required("lhost", "Listener host"),
        defaulted("lport", "4444", "Listener port"),
        defaulted("format", "elf", "Output format"),
        optional("output_file", "Output file path"),
        ADDITIONAL_ARGS,
    ]),
    // Vulnerability scanning
    tool!("openvas", "openvas_scan", VulnerabilityScanning, "Create an OpenVAS/GVM scan target", [
        required("target", "Target host"),
        defaulted("scan_config", "full_and_fast", "Scan configuration"),
        ADDITIONAL_ARGS,
    ]),
    tool!("nuclei", "nuclei_scan", VulnerabilityScanning, "Template-based vulnerability scan with Nuclei", [
        required("target", "Target URL"),
        optional("templates", "Template paths or tags"),
        optional("severity", "Severity filter"),
        ADDITIONAL_ARGS,
    ]),
    tool!("lynis", "lynis_audit", VulnerabilityScanning, "Audit the local system with Lynis", [
        defaulted("audit_type", "system", "Audit type"),
        ADDITIONAL_ARGS,
    ]),
    // Database
    tool!("nosqlmap", "nosqlmap_scan", Database, "Test for NoSQL injection with NoSQLMap", [
        required("url", "Target URL"),
        defaulted("method", "GET", "HTTP method"),
        optional("data", "POST data string"),
        ADDITIONAL_ARGS,
    ]),
    // Forensics
    tool!("binwalk", "binwalk_analyze", Forensics, "Analyze firmware images with Binwalk", [
        required("file_path", "File to analyze"),
        flag("extract", false, "Extract embedded files"),
        ADDITIONAL_ARGS,
    ]),
    tool!("foremost", "foremost_recover", Forensics, "Recover files by carving with Foremost", [
        required("file_path", "Input image"),
        defaulted("output_dir", "/tmp/foremost_output", "Output directory"),
        optional("file_types", "File types to carve"),
        ADDITIONAL_ARGS,
    ]),
    // Anonymity
    tool!("proxychains", "proxychains_run", Anonymity, "Run a command through proxychains", [
        required("command", "Command to proxy"),
        optional("config_file", "Proxychains configuration file"),
        ADDITIONAL_ARGS,
    ]),
    // Mobile
    tool!("apktool", "apktool_run", Mobile, "Decode or rebuild Android packages with Apktool", [
        required("mode", "decode or build"),
        required("apk_path", "APK file or decoded directory"),
        optional("output_dir", "Output path"),
        ADDITIONAL_ARGS,
    ]),
];

/// Look up a tool by endpoint name
pub fn find(name: &str) -> Option<&'static ToolSpec> {
    TOOLS.iter().find(|t| t.name == name)
}
