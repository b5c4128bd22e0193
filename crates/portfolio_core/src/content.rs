//! Authored sections that never touch the network.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skill {
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Certification {
    pub name: &'static str,
    pub issuer: &'static str,
    pub year: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientEngagement {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocialLink {
    pub label: &'static str,
    pub url: &'static str,
}

pub const ABOUT: &[&str] = &[
    "Web developer with hands-on experience in the MERN stack, EJS templating and MySQL, \
     comfortable with Git and deployment on modern hosting platforms.",
    "Builds full-stack applications with React, Node.js, Express, MongoDB and MySQL, \
     with a focus on maintainable code, responsive UI and RESTful APIs.",
];

pub const SKILLS: &[Skill] = &[
    Skill { name: "MongoDB" },
    Skill { name: "Express.js" },
    Skill { name: "React" },
    Skill { name: "Node.js" },
    Skill { name: "MySQL" },
    Skill { name: "Git" },
    Skill { name: "Tailwind CSS" },
    Skill { name: "HTML5" },
    Skill { name: "CSS3" },
    Skill { name: "JavaScript" },
    Skill { name: "Bootstrap" },
    Skill { name: "Database" },
];

pub const CERTIFICATIONS: &[Certification] = &[
    Certification {
        name: "Web Developer",
        issuer: "PMKKY",
        year: 2024,
    },
    Certification {
        name: "Basketball Coordinator",
        issuer: "Malwa Institute of Science and Technology, Indore",
        year: 2025,
    },
];

pub const CLIENTS: &[ClientEngagement] = &[
    ClientEngagement {
        name: "E-commerce Startup",
        description: "Full-featured e-commerce site with product management, payment gateway \
                      integration and admin/user dashboards.",
    },
    ClientEngagement {
        name: "Gym Chain Owner",
        description: "Gym membership and management system with owner analytics and visit tracking.",
    },
    ClientEngagement {
        name: "Local Pandit Service",
        description: "Booking platform for pandits supporting offline and online pooja services.",
    },
];

pub const SOCIAL_LINKS: &[SocialLink] = &[
    SocialLink {
        label: "GitHub",
        url: "https://github.com/gaurav-prajapat",
    },
    SocialLink {
        label: "LinkedIn",
        url: "https://linkedin.com/in/gauravkumar07",
    },
    SocialLink {
        label: "Email",
        url: "mailto:gauravprajapat2305@gmail.com",
    },
];
