//! Canned-answer lookup tables for interview-style prompts.
//!
//! Two ordered tables are consulted in sequence: the topic lexicon (interview
//! topics, plain substring keywords) and the meta rules (conversational
//! keywords, including co-occurrence triggers). Within each table the first
//! matching entry wins, so declaration order is part of the contract.

/// A single keyword-to-answer mapping. Keywords match as case-insensitive
/// substrings of the input.
#[derive(Debug, Clone, Copy)]
pub struct LexiconEntry {
    pub keyword: &'static str,
    pub answer: &'static str,
}

/// How a meta rule decides whether it applies to a lowered input.
#[derive(Debug, Clone, Copy)]
pub enum Trigger {
    /// Applies when any keyword is a substring of the input.
    Any(&'static [&'static str]),
    /// Applies only when every keyword is a substring of the input.
    All(&'static [&'static str]),
}

impl Trigger {
    fn matches(&self, lowered: &str) -> bool {
        match self {
            Trigger::Any(keywords) => keywords.iter().any(|k| lowered.contains(k)),
            Trigger::All(keywords) => keywords.iter().all(|k| lowered.contains(k)),
        }
    }
}

/// A conversational rule evaluated after the topic lexicon.
#[derive(Debug, Clone, Copy)]
pub struct MetaRule {
    pub trigger: Trigger,
    pub answer: &'static str,
}

/// Interview-topic answers, in priority order.
const TOPIC_ENTRIES: &[LexiconEntry] = &[
    LexiconEntry {
        keyword: "life story",
        answer: "I am a passionate AI developer with a background in software engineering. My journey started with a curiosity about how technology can solve real-world problems. Over the years, I have worked on various projects ranging from web applications to machine learning models. I believe in continuous learning and adapting to new technologies. Outside of work, I enjoy reading, hiking, and contributing to open-source projects.",
    },
    LexiconEntry {
        keyword: "superpower",
        answer: "My #1 superpower is adaptability. I thrive in fast-paced environments and can quickly learn new technologies or methodologies. This allows me to contribute effectively to diverse projects and teams, regardless of the tech stack or domain.",
    },
    LexiconEntry {
        keyword: "grow",
        answer: "The top 3 areas I would like to grow in are: 1) Advanced AI/ML techniques and their practical applications, 2) Leadership and team management skills to mentor junior developers, and 3) Domain expertise in emerging technologies like blockchain and IoT.",
    },
    LexiconEntry {
        keyword: "misconception",
        answer: "A common misconception my coworkers might have is that I am always serious and focused only on work. While I am dedicated to my craft, I also value team bonding, humor, and creating a positive work environment. I enjoy casual conversations and building genuine relationships with colleagues.",
    },
    LexiconEntry {
        keyword: "boundaries",
        answer: "I push my boundaries by taking on challenging projects that are slightly outside my comfort zone. I regularly attend tech conferences, participate in hackathons, and dedicate time to learning new skills. I also seek feedback actively and use it as a tool for growth.",
    },
    LexiconEntry {
        keyword: "strength",
        answer: "One of my key strengths is problem-solving. I approach challenges methodically, breaking them down into manageable parts and finding creative solutions. I am also a strong communicator, which helps in collaborating effectively with cross-functional teams.",
    },
    LexiconEntry {
        keyword: "weakness",
        answer: "I tend to be a perfectionist, which sometimes means I spend more time than necessary on details. I am working on finding the right balance between quality and efficiency, learning when good enough is truly sufficient.",
    },
    LexiconEntry {
        keyword: "conflict",
        answer: "When faced with conflict, I believe in open and honest communication. I try to understand all perspectives, find common ground, and work towards a solution that benefits everyone. I am not afraid to have difficult conversations when they are necessary for the team success.",
    },
    LexiconEntry {
        keyword: "pressure",
        answer: "I handle pressure by staying organized and prioritizing tasks effectively. I break down large projects into smaller, manageable milestones and focus on one thing at a time. I also believe in taking short breaks to maintain mental clarity.",
    },
    LexiconEntry {
        keyword: "teamwork",
        answer: "I believe great teamwork comes from clear communication, mutual respect, and shared goals. I always strive to understand my teammates perspectives and contribute positively to the team dynamic. I am equally comfortable leading and following, depending on what the situation requires.",
    },
];

/// Conversational rules, in priority order. Evaluated only when no topic
/// entry matched.
const META_RULES: &[MetaRule] = &[
    MetaRule {
        trigger: Trigger::Any(&["hello", "hi", "hey"]),
        answer: "Hello! Welcome to the AI Interview Bot. I am here to help you practice for your interview. Feel free to ask me any questions about my background, skills, or experience. What would you like to know?",
    },
    MetaRule {
        trigger: Trigger::Any(&["name"]),
        answer: "I am an AI candidate preparing for the AI Agent Team position. I am excited about the opportunity to contribute my skills in software development and AI to your team!",
    },
    MetaRule {
        trigger: Trigger::Any(&["experience", "background"]),
        answer: "I have several years of experience in software development, with a focus on AI and machine learning applications. I have worked on projects involving natural language processing, computer vision, and full-stack web development. I am particularly proud of a recent project where I built an intelligent chatbot system that improved customer support efficiency by 40%.",
    },
    MetaRule {
        trigger: Trigger::Any(&["skill", "technology"]),
        answer: "My technical skills include Python, JavaScript/TypeScript, React, Node.js, and various AI/ML frameworks like TensorFlow and PyTorch. I am also experienced with cloud platforms (AWS, GCP), Docker, and CI/CD pipelines. I am always eager to learn new technologies and adapt to the team needs.",
    },
    MetaRule {
        trigger: Trigger::All(&["why", "job"]),
        answer: "I am excited about this position because it combines my passion for AI with the opportunity to work on impactful projects. Your company mission aligns with my values, and I believe my skills in AI development and collaborative problem-solving would make me a valuable addition to your team.",
    },
    MetaRule {
        trigger: Trigger::Any(&["salary", "compensation"]),
        answer: "I am open to discussing compensation based on the market rate for this position and my experience level. I value the total package including benefits, growth opportunities, and the chance to work on meaningful projects. I am confident we can find a mutually beneficial arrangement.",
    },
    MetaRule {
        trigger: Trigger::Any(&["remote", "work from home"]),
        answer: "I am fully comfortable with remote work. I have a dedicated home office setup and experience collaborating with distributed teams across different time zones. I use tools like Slack, Zoom, and project management platforms to stay connected and productive.",
    },
    MetaRule {
        trigger: Trigger::Any(&["question", "ask"]),
        answer: "I would love to learn more about the team structure, the specific projects I would be working on, and what success looks like in this role. I am also curious about opportunities for professional development and growth within the company.",
    },
];

/// Ordered canned-answer tables with first-match-wins lookup.
pub struct Lexicon {
    topics: &'static [LexiconEntry],
    rules: &'static [MetaRule],
}

impl Lexicon {
    /// The built-in interview tables.
    pub fn builtin() -> Self {
        Self::new(TOPIC_ENTRIES, META_RULES)
    }

    /// Build a lexicon over custom tables.
    pub fn new(topics: &'static [LexiconEntry], rules: &'static [MetaRule]) -> Self {
        Self { topics, rules }
    }

    /// Find the canned answer for an input, if any.
    ///
    /// Topic entries take precedence over meta rules; within each table the
    /// earliest declared match wins. Pure and deterministic.
    pub fn lookup(&self, input: &str) -> Option<&'static str> {
        let lowered = input.to_lowercase();
        self.lookup_topic(&lowered)
            .or_else(|| self.lookup_meta(&lowered))
    }

    fn lookup_topic(&self, lowered: &str) -> Option<&'static str> {
        self.topics
            .iter()
            .find(|e| lowered.contains(e.keyword))
            .map(|e| e.answer)
    }

    fn lookup_meta(&self, lowered: &str) -> Option<&'static str> {
        self.rules
            .iter()
            .find(|r| r.trigger.matches(lowered))
            .map(|r| r.answer)
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

// =============================================================================
// Tests
// =============================================================================
