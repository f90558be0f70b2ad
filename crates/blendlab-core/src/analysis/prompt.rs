use crate::model::CompositionResult;

/// Minimal request used to check that a key is accepted.
pub const CONNECTION_TEST_PROMPT: &str = "Hello";

/// Render composition as `name: value%` pairs, in the given order.
pub fn composition_line(composition: &[CompositionResult]) -> String {
    composition
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the blend analysis prompt.
///
/// Asks for the dominant components, the aroma profile, synergistic effects and
/// usage cautions, answered in Korean markdown.
pub fn build_analysis_prompt(composition: &[CompositionResult]) -> String {
    let mut prompt = String::new();

    prompt.push_str("다음은 에센셜 오일 블렌드의 화학적 구성 비율입니다.\n");
    prompt.push_str("이 구성을 기반으로 블렌드를 전문가처럼 분석해주세요.\n\n");

    prompt.push_str("분석 내용은 다음을 포함해야 합니다:\n");
    prompt.push_str(
        "1. **주요 화학 성분**: 가장 비율이 높은 3-4가지 성분을 언급하고 각각의 일반적인 특징을 설명해주세요.\n",
    );
    prompt.push_str(
        "2. **예상되는 아로마 프로필**: 이 화학 구성이 만들어낼 가능성이 높은 향기(예: 플로럴, 시트러스, 허브, 우디 등)를 묘사해주세요.\n",
    );
    prompt.push_str(
        "3. **예상되는 시너지 효과 및 특성**: 성분들이 조합되었을 때 기대할 수 있는 긍정적 효과(예: 안정감, 활력, 집중력 향상 등)를 설명해주세요.\n",
    );
    prompt.push_str(
        "4. **사용 시 주의사항**: 특정 성분의 비율이 높을 때 고려해야 할 점(예: 피부 자극 가능성)이 있다면 언급해주세요.\n\n",
    );

    prompt.push_str(
        "분석 결과는 마크다운 형식을 사용하여 명확하고 읽기 쉽게 작성해주세요. 모든 답변은 한국어로 제공해야 합니다.\n\n",
    );

    prompt.push_str("**화학 구성:**\n");
    prompt.push_str(&composition_line(composition));
    prompt.push('\n');

    prompt
}
