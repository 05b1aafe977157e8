//! In-process scripted catalog
//!
//! `FakeCatalog` plays the server side of the hidden-field protocol behind
//! the `Transport` trait. Every session (keyed by its `SESSION` cookie) has
//! its own page state; a request is only honoured when it echoes the
//! `ICStateNum` of the last page sent to that session. Faults can be
//! scheduled per action to exercise the walker's error boundaries.

use async_trait::async_trait;
use catalog_walker::auth::{AuthError, Authenticator};
use catalog_walker::config::{
    Config, CrawlerConfig, OutputConfig, RetryConfig, SessionConfig, TargetConfig,
};
use catalog_walker::crawler::PartitionKey;
use catalog_walker::transport::{Document, SessionToken, Transport, TransportError};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

pub const ACTION_KEY: &str = "ICAction";
pub const TERM_PARAM: &str = "DERIVED_SAA_CRS_TERM_ALT";

pub const EXPAND_ALL: &str = "DERIVED_SSS_BCC_SSS_EXPAND_ALL$97$";
pub const COURSE_RETURN: &str = "DERIVED_SAA_CRS_RETURN_PB$163$";
pub const LEAVE_BRANCH: &str = "DERIVED_SSS_SEL_RETURN_PB$181$";
pub const VIEW_SECTIONS: &str = "DERIVED_SAA_CRS_SSR_PB_GO";
pub const SELECT_TERM: &str = "DERIVED_SAA_CRS_SSR_PB_GO$3$";
pub const VIEW_ALL: &str = "CLASS_TBL_VW5$hviewall$0";
pub const CLOSE_SECTION: &str = "CLASS_SRCH_WRK2_SSR_PB_CLOSE";

const LETTER_PREFIX: &str = "DERIVED_SSS_BCC_SSR_ALPHANUM_";

// ---------------------------------------------------------------------------
// Catalog content
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SectionSpec {
    pub name: &'static str,
    pub class_number: &'static str,
    pub kind: &'static str,
}

#[derive(Debug, Clone)]
pub struct TermSpec {
    pub value: &'static str,
    pub label: &'static str,
    pub sections: Vec<SectionSpec>,
}

/// A course page; `terms: None` renders a detail page without sections
#[derive(Debug, Clone)]
pub struct OfferingSpec {
    pub level: &'static str,
    pub terms: Option<Vec<TermSpec>>,
}

#[derive(Debug, Clone)]
pub enum CourseShape {
    Single(OfferingSpec),
    Branch(Vec<OfferingSpec>),
}

#[derive(Debug, Clone)]
pub struct CourseSpec {
    pub number: &'static str,
    pub title: &'static str,
    pub shape: CourseShape,
}

#[derive(Debug, Clone)]
pub struct DepartmentSpec {
    pub code: &'static str,
    pub name: &'static str,
    pub courses: Vec<CourseSpec>,
}

/// Letter A: one Leaf course with a collapsed two-section term, one
/// placeholder course, one Branch course with a Leaf and a Detail offering.
/// Letter B: one Detail course.
/// Letter C: one single-offering course and one Branch course with two
/// offerings, each offering with one term of one section.
/// Every other letter is empty.
pub fn sample_catalog() -> BTreeMap<char, Vec<DepartmentSpec>> {
    let mut catalog = BTreeMap::new();

    catalog.insert(
        'A',
        vec![DepartmentSpec {
            code: "ANAT",
            name: "Anatomy",
            courses: vec![
                CourseSpec {
                    number: "100",
                    title: "Intro Anatomy",
                    shape: CourseShape::Single(OfferingSpec {
                        level: "Undergraduate",
                        terms: Some(vec![TermSpec {
                            value: "2189",
                            label: "2018 Fall",
                            sections: vec![
                                SectionSpec {
                                    name: "001-LEC",
                                    class_number: "1001",
                                    kind: "Lecture",
                                },
                                SectionSpec {
                                    name: "002-LAB",
                                    class_number: "1002",
                                    kind: "Laboratory",
                                },
                            ],
                        }]),
                    }),
                },
                CourseSpec {
                    number: "200",
                    title: "Unspecified Transfer Credit",
                    shape: CourseShape::Single(OfferingSpec {
                        level: "Undergraduate",
                        terms: None,
                    }),
                },
                CourseSpec {
                    number: "300",
                    title: "Advanced Anatomy",
                    shape: CourseShape::Branch(vec![
                        OfferingSpec {
                            level: "Undergraduate",
                            terms: Some(vec![TermSpec {
                                value: "2191",
                                label: "2019 Winter",
                                sections: vec![SectionSpec {
                                    name: "001-LEC",
                                    class_number: "3001",
                                    kind: "Lecture",
                                }],
                            }]),
                        },
                        OfferingSpec {
                            level: "Graduate",
                            terms: None,
                        },
                    ]),
                },
            ],
        }],
    );

    catalog.insert(
        'B',
        vec![DepartmentSpec {
            code: "BIOL",
            name: "Biology",
            courses: vec![CourseSpec {
                number: "101",
                title: "General Biology",
                shape: CourseShape::Single(OfferingSpec {
                    level: "Undergraduate",
                    terms: None,
                }),
            }],
        }],
    );

    let one_section = |term: &'static str, label: &'static str, class_number: &'static str| {
        Some(vec![TermSpec {
            value: term,
            label,
            sections: vec![SectionSpec {
                name: "001-LEC",
                class_number,
                kind: "Lecture",
            }],
        }])
    };

    catalog.insert(
        'C',
        vec![DepartmentSpec {
            code: "CHEM",
            name: "Chemistry",
            courses: vec![
                CourseSpec {
                    number: "112",
                    title: "General Chemistry",
                    shape: CourseShape::Single(OfferingSpec {
                        level: "Undergraduate",
                        terms: one_section("2189", "2018 Fall", "5001"),
                    }),
                },
                CourseSpec {
                    number: "401",
                    title: "Spectroscopy",
                    shape: CourseShape::Branch(vec![
                        OfferingSpec {
                            level: "Undergraduate",
                            terms: one_section("2191", "2019 Winter", "5002"),
                        },
                        OfferingSpec {
                            level: "Graduate",
                            terms: one_section("2191", "2019 Winter", "5003"),
                        },
                    ]),
                },
            ],
        }],
    );

    catalog
}

// ---------------------------------------------------------------------------
// Faults and request log
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Fail at the transport layer without touching server state
    Status(u16),
    /// Apply the transition but answer with a page matching no known shape
    Garbage,
    /// Panic inside the transport call
    Panic,
}

struct ScheduledFault {
    session: Option<String>,
    action: String,
    remaining: usize,
    fault: Fault,
}

/// One request as the server saw it
#[derive(Debug, Clone)]
pub struct LoggedRequest {
    pub session: String,
    pub params: BTreeMap<String, String>,
    /// Whether the last page sent to this session carried `ICFocus`
    pub focus_was_sent: bool,
}

impl LoggedRequest {
    pub fn action(&self) -> Option<&str> {
        self.params.get(ACTION_KEY).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Server state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Root,
    LetterCollapsed,
    Letter,
    Course,
    Offering,
    Terms,
    Sections,
    Section,
}

#[derive(Debug, Default)]
struct SessionState {
    state_num: u32,
    focus_sent: bool,
    page: Page,
    letter: Option<char>,
    course: Option<usize>,
    offering: Option<usize>,
    term: Option<usize>,
    section: Option<usize>,
    sections_expanded: bool,
}

#[derive(Default)]
struct Inner {
    sessions: HashMap<String, SessionState>,
    log: Vec<LoggedRequest>,
    faults: Vec<ScheduledFault>,
    stale: usize,
    rejected: usize,
}

pub struct FakeCatalog {
    catalog: BTreeMap<char, Vec<DepartmentSpec>>,
    inner: Mutex<Inner>,
    /// Repeat the course title on the term and section listings
    course_header: bool,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self {
            catalog: sample_catalog(),
            inner: Mutex::new(Inner::default()),
            course_header: false,
        }
    }

    /// Term and section listings that still show the course title, so they
    /// classify as course details
    pub fn with_course_header() -> Self {
        Self {
            course_header: true,
            ..Self::new()
        }
    }

    /// Schedules `fault` for the next `times` requests carrying `action`
    pub fn fail(&self, session: Option<&str>, action: &str, times: usize, fault: Fault) {
        self.inner.lock().unwrap().faults.push(ScheduledFault {
            session: session.map(String::from),
            action: action.to_string(),
            remaining: times,
            fault,
        });
    }

    pub fn requests(&self) -> Vec<LoggedRequest> {
        self.inner.lock().unwrap().log.clone()
    }

    pub fn requests_for(&self, session: &str) -> Vec<LoggedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.session == session)
            .collect()
    }

    pub fn count_action(&self, action: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.action() == Some(action))
            .count()
    }

    /// Requests whose `ICStateNum` did not match the last page sent
    pub fn stale_requests(&self) -> usize {
        self.inner.lock().unwrap().stale
    }

    /// Requests naming an action that makes no sense on the current page
    pub fn rejected_requests(&self) -> usize {
        self.inner.lock().unwrap().rejected
    }

    pub fn page_of(&self, session: &str) -> Option<Page> {
        self.inner
            .lock()
            .unwrap()
            .sessions
            .get(session)
            .map(|s| s.page)
    }

    fn courses_of(&self, letter: char) -> Vec<(&DepartmentSpec, &CourseSpec)> {
        self.catalog
            .get(&letter)
            .map(|departments| {
                departments
                    .iter()
                    .flat_map(|d| d.courses.iter().map(move |c| (d, c)))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn handle(&self, session_id: &str, params: &[(String, String)]) -> Result<String, TransportError> {
        let params: BTreeMap<String, String> = params.iter().cloned().collect();
        let mut inner = self.inner.lock().unwrap();

        let focus_was_sent = inner
            .sessions
            .get(session_id)
            .map(|s| s.focus_sent)
            .unwrap_or(false);
        inner.log.push(LoggedRequest {
            session: session_id.to_string(),
            params: params.clone(),
            focus_was_sent,
        });

        let action = params.get(ACTION_KEY).cloned().unwrap_or_default();
        let fault = take_fault(&mut inner.faults, session_id, &action);
        match fault {
            Some(Fault::Status(code)) => return Err(TransportError::Status(code)),
            Some(Fault::Panic) => {
                drop(inner);
                panic!("scripted panic on {}", action);
            }
            _ => {}
        }

        let Inner {
            sessions,
            stale,
            rejected,
            ..
        } = &mut *inner;

        if params.is_empty() {
            sessions.insert(session_id.to_string(), SessionState::default());
        }
        let state = sessions.entry(session_id.to_string()).or_default();

        if !params.is_empty() {
            let echoed = params.get("ICStateNum").cloned().unwrap_or_default();
            if echoed != state.state_num.to_string() {
                *stale += 1;
                return Ok(self.render_error(state, "stale page state"));
            }
            if !self.transition(state, &action, &params) {
                *rejected += 1;
                return Ok(self.render_error(state, "unexpected action"));
            }
        }

        if fault == Some(Fault::Garbage) {
            return Ok(self.render_error(state, "garbled response"));
        }
        Ok(self.render(state))
    }

    /// Applies one action to the session; false when it is not allowed here
    fn transition(&self, s: &mut SessionState, action: &str, params: &BTreeMap<String, String>) -> bool {
        if let Some(letter) = action.strip_prefix(LETTER_PREFIX) {
            let Some(letter) = letter.chars().next() else {
                return false;
            };
            *s = SessionState {
                state_num: s.state_num,
                sections_expanded: s.sections_expanded,
                letter: Some(letter),
                page: Page::LetterCollapsed,
                ..SessionState::default()
            };
            return true;
        }

        let term_param = params.get(TERM_PARAM);

        match (s.page, action) {
            (Page::LetterCollapsed, EXPAND_ALL) => s.page = Page::Letter,
            (Page::Letter, a) if a.starts_with("CRSE_NBR$") => {
                let Some(index) = index_after(a, "CRSE_NBR$") else {
                    return false;
                };
                if index >= self.courses_of(s.letter.unwrap_or('?')).len() {
                    return false;
                }
                s.course = Some(index);
                s.page = Page::Course;
            }
            (Page::Course, a) if a.starts_with("CAREER$") => {
                let Some(index) = index_after(a, "CAREER$") else {
                    return false;
                };
                match self.course_shape(s) {
                    Some(CourseShape::Branch(offerings)) if index < offerings.len() => {
                        s.offering = Some(index);
                        s.page = Page::Offering;
                    }
                    _ => return false,
                }
            }
            (Page::Course, LEAVE_BRANCH) if self.is_branch(s) => {
                s.course = None;
                s.page = Page::Letter;
            }
            (Page::Course, COURSE_RETURN) if !self.is_branch(s) => {
                s.course = None;
                s.page = Page::Letter;
            }
            (Page::Offering, COURSE_RETURN) => {
                s.offering = None;
                s.page = Page::Course;
            }
            (Page::Course | Page::Offering, VIEW_SECTIONS) => {
                if self.current_terms(s).is_none() {
                    return false;
                }
                s.term = None;
                s.page = Page::Terms;
            }
            (Page::Terms | Page::Sections, COURSE_RETURN) => {
                s.term = None;
                if s.offering.take().is_some() {
                    s.page = Page::Course;
                } else {
                    s.course = None;
                    s.page = Page::Letter;
                }
            }
            (Page::Terms | Page::Sections, SELECT_TERM) => {
                let terms = self.current_terms(s).unwrap_or_default();
                let Some(index) = term_param.and_then(|v| terms.iter().position(|t| t.value == v.as_str())) else {
                    return false;
                };
                s.term = Some(index);
                s.page = Page::Sections;
            }
            (Page::Sections, VIEW_ALL) => {
                if !self.term_param_matches(s, term_param) {
                    return false;
                }
                s.sections_expanded = !s.sections_expanded;
            }
            (Page::Sections, a) if a.starts_with("CLASS_SECTION$") => {
                let Some(index) = index_after(a, "CLASS_SECTION$") else {
                    return false;
                };
                if !self.term_param_matches(s, term_param) || index >= self.visible_sections(s).len() {
                    return false;
                }
                s.section = Some(index);
                s.page = Page::Section;
            }
            (Page::Section, CLOSE_SECTION) => {
                s.section = None;
                s.page = Page::Sections;
            }
            // Closing an already closed section leaves the listing as it is
            (Page::Sections, CLOSE_SECTION) => {}
            _ => return false,
        }
        true
    }

    fn course(&self, s: &SessionState) -> Option<(&DepartmentSpec, &CourseSpec)> {
        let courses = self.courses_of(s.letter?);
        courses.get(s.course?).copied()
    }

    fn course_shape(&self, s: &SessionState) -> Option<&CourseShape> {
        self.course(s).map(|(_, c)| &c.shape)
    }

    fn is_branch(&self, s: &SessionState) -> bool {
        matches!(self.course_shape(s), Some(CourseShape::Branch(_)))
    }

    fn current_offering(&self, s: &SessionState) -> Option<&OfferingSpec> {
        match self.course_shape(s)? {
            CourseShape::Single(offering) => Some(offering),
            CourseShape::Branch(offerings) => offerings.get(s.offering?),
        }
    }

    fn current_terms(&self, s: &SessionState) -> Option<Vec<TermSpec>> {
        self.current_offering(s)?.terms.clone()
    }

    fn current_term(&self, s: &SessionState) -> Option<TermSpec> {
        self.current_terms(s)?.get(s.term?).cloned()
    }

    fn term_param_matches(&self, s: &SessionState, param: Option<&String>) -> bool {
        match (self.current_term(s), param) {
            (Some(term), Some(value)) => term.value == value.as_str(),
            _ => false,
        }
    }

    /// A collapsed listing shows only the first section
    fn visible_sections(&self, s: &SessionState) -> Vec<SectionSpec> {
        let sections = self.current_term(s).map(|t| t.sections).unwrap_or_default();
        if s.sections_expanded {
            sections
        } else {
            sections.into_iter().take(1).collect()
        }
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    fn render(&self, s: &mut SessionState) -> String {
        let body = match s.page {
            Page::Root | Page::LetterCollapsed => letter_links(),
            Page::Letter => format!("{}{}", letter_links(), self.department_groups(s)),
            Page::Course => self.course_page(s),
            Page::Offering => self.offering_page(s),
            Page::Terms => self.term_select(s),
            Page::Sections => format!("{}{}", self.term_select(s), self.section_list(s)),
            Page::Section => self.section_page(s),
        };
        let focus = s.page == Page::Letter;
        page(s, focus, &body)
    }

    fn render_error(&self, s: &mut SessionState, message: &str) -> String {
        page(s, false, &format!("<h1>Error</h1><p>{}</p>", message))
    }

    fn department_groups(&self, s: &SessionState) -> String {
        let Some(departments) = s.letter.and_then(|l| self.catalog.get(&l)) else {
            return String::new();
        };

        let mut html = String::new();
        let mut course_index = 0;
        for (d, department) in departments.iter().enumerate() {
            html.push_str(&format!(
                r#"<table id="ACE_DERIVED_SSS_BCC_GROUP_BOX_1${d}"><tr><td><span id="DERIVED_SSS_BCC_GROUP_BOX_1$147$$span${d}">{} - {}</span></td></tr>"#,
                department.code, department.name
            ));
            for course in &department.courses {
                html.push_str(&format!(
                    r#"<tr id="trCOURSE_LIST${d}_row{course_index}"><td><a id="CRSE_NBR${course_index}">{}</a></td><td><span id="CRSE_TITLE${course_index}">{}</span></td></tr>"#,
                    course.number, course.title
                ));
                course_index += 1;
            }
            html.push_str("</table>");
        }
        html
    }

    fn course_page(&self, s: &SessionState) -> String {
        let Some((department, course)) = self.course(s) else {
            return String::new();
        };
        match &course.shape {
            CourseShape::Single(offering) => course_detail(department, course, offering),
            CourseShape::Branch(offerings) => {
                let mut html = format!(
                    r#"<span id="DERIVED_CRSECAT_DESCR200">{} {} - {}</span><table id="CRSE_OFFERINGS$scroll$0">"#,
                    department.code, course.number, course.title
                );
                for (i, offering) in offerings.iter().enumerate() {
                    html.push_str(&format!(
                        r#"<tr><td><a id="CAREER${i}">{}</a></td></tr>"#,
                        offering.level
                    ));
                }
                html.push_str("</table>");
                html
            }
        }
    }

    fn offering_page(&self, s: &SessionState) -> String {
        match (self.course(s), self.current_offering(s)) {
            (Some((department, course)), Some(offering)) => course_detail(department, course, offering),
            _ => String::new(),
        }
    }

    fn term_select(&self, s: &SessionState) -> String {
        let mut html = match self.course(s) {
            Some((department, course)) if self.course_header => format!(
                r#"<span id="DERIVED_CRSECAT_DESCR200">{} {} - {}</span>"#,
                department.code, course.number, course.title
            ),
            _ => String::new(),
        };
        html.push_str(&format!(r#"<select id="{}">"#, TERM_PARAM));
        for term in self.current_terms(s).unwrap_or_default() {
            html.push_str(&format!(
                r#"<option value="{}">{}</option>"#,
                term.value, term.label
            ));
        }
        html.push_str(r#"</select><input type="button" id="DERIVED_SAA_CRS_SSR_PB_GO$3$" value="Show sections">"#);
        html
    }

    fn section_list(&self, s: &SessionState) -> String {
        let mut html = String::from("<table>");
        for (i, section) in self.visible_sections(s).iter().enumerate() {
            html.push_str(&format!(
                r#"<tr><td><a id="CLASS_SECTION${i}">{} Regular</a></td></tr>"#,
                section.name
            ));
        }
        html.push_str("</table>");
        let toggle = if s.sections_expanded { "View 5" } else { "View All Sections" };
        html.push_str(&format!(r#"<a id="{}">{}</a>"#, VIEW_ALL, toggle));
        html
    }

    fn section_page(&self, s: &SessionState) -> String {
        let (Some((department, course)), Some(offering), Some(term)) =
            (self.course(s), self.current_offering(s), self.current_term(s))
        else {
            return String::new();
        };
        let Some(section) = s.section.and_then(|i| self.visible_sections(s).get(i).cloned()) else {
            return String::new();
        };
        format!(
            r#"<span id="DERIVED_CLSRCH_DESCR200">{dept} {num} - {name}</span>
               <span id="DERIVED_CLSRCH_SSS_PAGE_KEYDESCR">{level} | {term} | {kind}</span>
               <span id="SSR_CLS_DTL_WRK_CLASS_NBR">{class}</span>
               <div id="win0divSSR_CLS_DTL_WRK_ENRL_CAP">100</div>
               <div id="win0divSSR_CLS_DTL_WRK_ENRL_TOT">42</div>"#,
            dept = department.code,
            num = course.number,
            name = section.name,
            level = offering.level,
            term = term.label,
            kind = section.kind,
            class = section.class_number,
        )
    }
}

impl Default for FakeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for FakeCatalog {
    async fn fetch(
        &self,
        params: &[(String, String)],
        token: &SessionToken,
    ) -> Result<Document, TransportError> {
        let session = token
            .cookies
            .get("SESSION")
            .cloned()
            .unwrap_or_else(|| "anonymous".to_string());
        self.handle(&session, params).map(Document::new)
    }
}

fn take_fault(faults: &mut [ScheduledFault], session: &str, action: &str) -> Option<Fault> {
    let scheduled = faults.iter_mut().find(|f| {
        f.remaining > 0
            && f.action == action
            && f.session.as_deref().map_or(true, |s| s == session)
    })?;
    scheduled.remaining -= 1;
    Some(scheduled.fault)
}

fn index_after(action: &str, prefix: &str) -> Option<usize> {
    action.strip_prefix(prefix)?.parse().ok()
}

fn page(s: &mut SessionState, focus: bool, body: &str) -> String {
    s.state_num += 1;
    s.focus_sent = focus;
    let focus_field = if focus {
        r#"<input type="hidden" name="ICFocus" value="letters">"#
    } else {
        ""
    };
    format!(
        r#"<html><body><form>
           <div id="win0divPSHIDDENFIELDS">
             <input type="hidden" name="ICStateNum" value="{}">
             <input type="hidden" name="ICSID" value="fake-sid">
             {}
           </div>
           {}
           </form></body></html>"#,
        s.state_num, focus_field, body
    )
}

fn letter_links() -> String {
    ('A'..='Z')
        .map(|l| format!(r#"<a id="{}{}">{}</a>"#, LETTER_PREFIX, l, l))
        .collect()
}

fn course_detail(department: &DepartmentSpec, course: &CourseSpec, offering: &OfferingSpec) -> String {
    let sections_button = if offering.terms.is_some() {
        r#"<input type="button" id="DERIVED_SAA_CRS_SSR_PB_GO" value="View class sections">"#
    } else {
        ""
    };
    format!(
        r#"<span id="DERIVED_CRSECAT_DESCR200">{} {} - {}</span>
           <span id="SSR_CRSE_OFF_VW_ACAD_CAREER">{}</span>
           <span id="CAMPUS_TBL_DESCR">Main Campus</span>
           <span id="DERIVED_CRSECAT_UNITS_RANGE">3.00</span>
           {}"#,
        department.code, course.number, course.title, offering.level, sections_button
    )
}

// ---------------------------------------------------------------------------
// Walker wiring
// ---------------------------------------------------------------------------

/// Gives each partition its own `SESSION` cookie; rejects chosen letters
#[derive(Default)]
pub struct LetterAuthenticator {
    rejected: Vec<char>,
}

impl LetterAuthenticator {
    pub fn rejecting(letters: &[char]) -> Self {
        Self {
            rejected: letters.to_vec(),
        }
    }
}

#[async_trait]
impl Authenticator for LetterAuthenticator {
    async fn authenticate(&self, partition: &PartitionKey) -> Result<SessionToken, AuthError> {
        if self.rejected.contains(&partition.letter()) {
            return Err(AuthError::Rejected(partition.to_string()));
        }
        let mut cookies = BTreeMap::new();
        cookies.insert("SESSION".to_string(), partition.to_string());
        Ok(SessionToken::new(cookies))
    }
}

pub fn test_config(letters: &str, workers: u32, directory: &str) -> Config {
    Config {
        target: TargetConfig {
            endpoint: "https://catalog.example.edu/psc/search".to_string(),
            action_key: ACTION_KEY.to_string(),
            timeout_secs: 5,
            user_agent: None,
        },
        retry: RetryConfig::default(),
        crawler: CrawlerConfig {
            workers,
            request_delay_ms: 0,
            letters: Some(letters.to_string()),
            placeholder_title: "unspecified".to_string(),
        },
        session: SessionConfig::default(),
        output: OutputConfig {
            directory: directory.to_string(),
            database_path: None,
            summary_path: None,
        },
    }
}

pub fn key(letter: char) -> PartitionKey {
    PartitionKey::new(letter).unwrap()
}

/// Session tokens the way `LetterAuthenticator` issues them
pub struct LetterToken;

impl LetterToken {
    pub fn for_letter(letter: char) -> SessionToken {
        let mut cookies = BTreeMap::new();
        cookies.insert("SESSION".to_string(), letter.to_string());
        SessionToken::new(cookies)
    }
}
