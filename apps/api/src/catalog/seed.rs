//! Curated starter dataset written into an empty catalog at startup.

use tracing::info;

use crate::catalog::store::{load_catalog, persist_catalog, CatalogStore, StoreError};
use crate::models::catalog::{PriceTier, ToolRecord};
use crate::retry::RetryPolicy;

/// (tool_name, role, situation, output, tips, price label, link)
const STARTER_TOOLS: &[(&str, &str, &str, &str, &str, &str, &str)] = &[
    ("Perplexity", "공통", "자료 조사 및 검색", "요약 텍스트", "출처가 명시되어 팩트 체크 필수인 업무에 최적화 (할루시네이션 적음)", "부분유료", "https://www.perplexity.ai/"),
    ("Claude 3.5 Sonnet", "공통", "긴 글 작성 및 초안", "보고서/메일", "사람처럼 자연스러운 문체와 긴 문맥 이해력 (보고서 초안용)", "부분유료", "https://claude.ai/"),
    ("DeepL", "공통", "외국어 번역", "번역 텍스트", "전문 용어와 뉘앙스를 살린 고품질 번역 (파일 통번역 가능)", "부분유료", "https://www.deepl.com/"),
    ("Clova Note", "공통", "회의 녹음 및 속기", "회의록", "한국어 인식률 최상, 화자 분리 및 핵심 요약 기능 탁월", "무료/부분유료", "https://clovanote.naver.com/"),
    ("Lilys", "공통", "유튜브 영상 요약", "요약 노트", "긴 영상의 핵심 내용을 타임라인별로 요약하여 블로그/문서로 변환", "부분유료", "https://lilys.ai/"),
    ("Wrtn (뤼튼)", "공무원/공공", "보도자료 및 공문서 초안", "초안 텍스트", "GPT-4 기반 무료 사용 가능, 한국어 공문서 말투 생성에 강점", "무료/부분유료", "https://wrtn.ai/"),
    ("Polaris Office AI", "공무원/공공", "문서 편집 및 변환", "HWP/문서", "HWP 파일 열람 및 AI를 통한 문장 다듬기/요약 기능 지원", "부분유료", "https://www.polarisoffice.com/"),
    ("Naver Cue:", "공무원/공공", "국내 정책 및 정보 검색", "검색 결과", "네이버 데이터 기반으로 국내 정보/정책 검색에 특화됨", "무료", "https://cue.naver.com/"),
    ("Julius AI", "금융/재무", "복잡한 데이터 분석", "시각화 차트", "엑셀/CSV 파일을 올리면 대화형으로 분석하고 차트 생성 (파이썬 기반)", "유료", "https://julius.ai/"),
    ("ChatDOC", "금융/재무", "금융 보고서/PDF 분석", "요약 및 답변", "수백 장의 금융 보고서를 읽고 정확한 수치 기반 답변 제공 (출처 표시)", "부분유료", "https://chatdoc.com/"),
    ("ChatGPT (Data Analyst)", "금융/재무", "시장 리서치 및 전망", "리서치 리포트", "웹 검색과 데이터 분석 기능을 결합해 시장 동향 파악에 용이", "부분유료", "https://chat.openai.com/"),
    ("Whimsical AI", "기획자(PM)", "기획안 시각화/마인드맵", "다이어그램", "텍스트로 아이디어를 입력하면 마인드맵과 플로우차트 자동 생성", "부분유료", "https://whimsical.com/ai"),
    ("Notion AI", "기획자(PM)", "문서 정리 및 프로젝트 관리", "노션 페이지", "지저분한 메모를 깔끔한 기획서로 정리 및 투두 리스트 추출", "유료", "https://www.notion.so/product/ai"),
    ("ChatGPT (Canvas)", "기획자(PM)", "설문조사 결과 분석", "인사이트 리포트", "설문 응답 데이터를 업로드하면 주요 패턴과 인사이트 도출", "부분유료", "https://chat.openai.com/"),
    ("Gamma", "마케터", "PPT 기획 및 디자인", "PPT 슬라이드", "주제만 입력하면 목차부터 고품질 디자인 슬라이드 자동 생성", "부분유료", "https://gamma.app/"),
    ("Copy.ai", "마케터", "블로그/SNS 마케팅 문구", "광고 카피", "다양한 마케팅 프레임워크(AIDA 등)에 맞춘 카피라이팅 특화", "유료", "https://www.copy.ai/"),
    ("Midjourney", "마케터", "광고용 이미지 생성", "이미지", "예술적이고 창의적인 고퀄리티 이미지 생성 (디스코드 사용)", "유료", "https://www.midjourney.com/"),
    ("Vrew", "마케터", "영상 숏폼 제작", "숏폼 영상", "대본만 넣으면 AI 목소리와 무료 이미지를 매칭해 영상 자동 생성", "부분유료", "https://vrew.voyagerx.com/"),
    ("Jasper", "인사(HR)", "채용 공고 및 JD 작성", "채용 공고문", "기업 톤앤매너에 맞춘 전문적인 비즈니스 글쓰기 지원", "유료", "https://www.jasper.ai/"),
    ("Synthesia", "인사(HR)", "온보딩 자료 제작", "교육 자료", "텍스트를 입력하면 AI 아바타가 설명하는 교육 영상 생성", "유료", "https://www.synthesia.io/"),
    ("ChatGPT (GPT-4)", "영업(Sales)", "콜드 메일 작성", "이메일 초안", "고객 페르소나를 설정하여 거부감 없는 제안 메일 작성 가능", "부분유료", "https://chat.openai.com/"),
    ("Adobe Firefly", "디자이너", "이미지 편집 및 확장", "이미지", "포토샵 생성형 채우기 기능, 저작권 문제 없이 상업적 이용 가능", "유료", "https://firefly.adobe.com/"),
    ("Canva Magic Studio", "디자이너", "상세페이지/배너", "디자인 시안", "명령어로 SNS 게시물, 배너 등 디자인 템플릿 즉시 생성", "부분유료", "https://www.canva.com/"),
    ("Cursor", "개발자", "코드 작성 및 디버깅", "소스 코드", "VS Code 기반 AI 에디터, 프로젝트 전체 구조를 이해하고 코딩 지원", "부분유료", "https://www.cursor.com/"),
    ("GitHub Copilot", "개발자", "코드 자동 완성", "코드 조각", "주석이나 함수명만 쓰면 코드를 자동 완성 (생산성 표준 도구)", "유료", "https://github.com/features/copilot"),
    ("ChatPDF", "대학생/연구원", "논문 분석 및 요약", "PDF 요약", "논문 PDF를 업로드하면 내용을 파악하고 질문에 답변", "부분유료", "https://www.chatpdf.com/"),
    ("Consensus", "대학생/연구원", "학술 검색 및 리서치", "논문 리스트", "질문을 던지면 관련 논문을 근거로 과학적 답변 생성", "부분유료", "https://consensus.app/"),
    ("ElevenLabs", "크리에이터", "텍스트 음성 변환(TTS)", "음성 파일", "가장 자연스럽고 감정 표현이 가능한 AI 목소리 생성", "유료", "https://elevenlabs.io/"),
    ("Suno AI", "크리에이터", "배경 음악 생성", "음악(BGM)", "원하는 장르와 분위기를 입력하면 보컬 곡/연주 곡 생성", "부분유료", "https://suno.com/"),
    ("Zapier", "직장인(총무)", "업무 자동화", "워크플로우", "코딩 없이 지메일, 슬랙, 노션 등을 연결해 반복 업무 자동화", "부분유료", "https://zapier.com/"),
];

pub fn starter_catalog() -> Vec<ToolRecord> {
    STARTER_TOOLS
        .iter()
        .map(
            |&(tool_name, role, situation, output, tips, price, link)| ToolRecord {
                tool_name: tool_name.to_string(),
                role: role.to_string(),
                situation: situation.to_string(),
                output: output.to_string(),
                tips: tips.to_string(),
                price_tier: PriceTier::from_label(price),
                link: link.to_string(),
                upvotes: 0,
                downvotes: 0,
            },
        )
        .collect()
}

/// Writes the starter dataset when the store holds no rows. Returns the number of
/// rows written (0 when the catalog already had data).
pub async fn seed_if_empty(
    store: &dyn CatalogStore,
    policy: &RetryPolicy,
) -> Result<usize, StoreError> {
    if !load_catalog(store, policy).await?.is_empty() {
        return Ok(0);
    }
    let records = starter_catalog();
    persist_catalog(store, policy, &records).await?;
    info!("Seeded empty catalog with {} starter tools", records.len());
    Ok(records.len())
}
