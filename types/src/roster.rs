//! Built-in customer profiles for roster mode.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Profile {
    pub customer_name: &'static str,
    pub email: &'static str,
    pub company_name: &'static str,
    pub persona: &'static str,
    pub booth: &'static str,
}

pub const PROFILES: [Profile; 8] = [
    Profile {
        customer_name: "John Smith",
        email: "john@email.com",
        company_name: "TechCorp",
        persona: "Developer",
        booth: "Demo Booth 1",
    },
    Profile {
        customer_name: "Sarah Johnson",
        email: "sarah@company.com",
        company_name: "DataCorp",
        persona: "Manager",
        booth: "Demo Booth 2",
    },
    Profile {
        customer_name: "Mike Wilson",
        email: "mike@startup.io",
        company_name: "StartupInc",
        persona: "CTO",
        booth: "Training Session",
    },
    Profile {
        customer_name: "Lisa Brown",
        email: "lisa@enterprise.com",
        company_name: "Enterprise Ltd",
        persona: "Analyst",
        booth: "Partner Demo",
    },
    Profile {
        customer_name: "David Lee",
        email: "david@consulting.com",
        company_name: "ConsultCorp",
        persona: "Consultant",
        booth: "POC Demo",
    },
    Profile {
        customer_name: "Emma Davis",
        email: "emma@fintech.com",
        company_name: "FinTech Solutions",
        persona: "Engineer",
        booth: "Technical Demo",
    },
    Profile {
        customer_name: "Jenny Kim",
        email: "jenny@healthcare.org",
        company_name: "HealthSystem",
        persona: "IT Manager",
        booth: "Healthcare Demo",
    },
    Profile {
        customer_name: "Carlos Rodriguez",
        email: "carlos@manufacturing.com",
        company_name: "MFG Corp",
        persona: "Operations Manager",
        booth: "Industry Demo",
    },
];

/// Profile assigned to a virtual user (round-robin over [PROFILES]).
pub fn profile_for(vuser_id: u32) -> &'static Profile {
    &PROFILES[vuser_id as usize % PROFILES.len()]
}
